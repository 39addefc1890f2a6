use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reference data
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO categories (id, name)
            VALUES
                (1, 'Electronics'),
                (2, 'Books'),
                (3, 'Computers')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO roles (id, authority)
            VALUES
                (1, 'ROLE_OPERATOR'),
                (2, 'ROLE_ADMIN')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        // Sample users (argon2id hashes, not real credentials)
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO users (id, first_name, last_name, email, password)
            VALUES
                (
                    1,
                    'Alex',
                    'Brown',
                    'alex@example.com',
                    '$argon2id$v=19$m=19456,t=2,p=1$VE0rHYzGbYjDhGgvhdzFPw$CJpleaNYKGFpc44EFOyWTE+fG2Z0A+6Ka2SlQQzroYA'
                ),
                (
                    2,
                    'Maria',
                    'Green',
                    'maria@example.com',
                    '$argon2id$v=19$m=19456,t=2,p=1$VE0rHYzGbYjDhGgvhdzFPw$CJpleaNYKGFpc44EFOyWTE+fG2Z0A+6Ka2SlQQzroYA'
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES
                (1, 1),
                (2, 1),
                (2, 2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
            )
            .await?;

        // Sample products
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO products (id, name, description, price, img_url, date)
            VALUES
                (
                    1,
                    'The Lord of the Rings',
                    'Lorem ipsum dolor sit amet, consectetur adipiscing elit.',
                    90.5,
                    'https://img.com/1-big.jpg',
                    '2024-10-20T03:00:00Z'
                ),
                (
                    2,
                    'Smart TV',
                    'Nulla eu imperdiet purus. Maecenas ante.',
                    2190.0,
                    'https://img.com/2-big.jpg',
                    '2024-10-20T03:00:00Z'
                ),
                (
                    3,
                    'Macbook Pro',
                    'Nam eleifend maximus tortor, at mollis.',
                    1250.0,
                    'https://img.com/3-big.jpg',
                    '2024-10-20T03:00:00Z'
                ),
                (
                    4,
                    'PC Gamer',
                    'Donec aliquet odio ac rhoncus cursus.',
                    1200.0,
                    'https://img.com/4-big.jpg',
                    '2024-10-20T03:00:00Z'
                ),
                (
                    5,
                    'Rails for Dummies',
                    'Cras fringilla convallis sem vel faucibus.',
                    100.99,
                    'https://img.com/5-big.jpg',
                    '2024-10-20T03:00:00Z'
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO product_categories (product_id, category_id)
            VALUES
                (1, 2),
                (2, 1),
                (3, 3),
                (4, 3),
                (5, 2)
            ON CONFLICT (product_id, category_id) DO NOTHING
            "#,
            )
            .await?;

        // Seeded rows carry explicit ids; move the sequences past them so
        // application inserts do not collide.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            SELECT setval('categories_id_seq', (SELECT MAX(id) FROM categories));
            SELECT setval('roles_id_seq', (SELECT MAX(id) FROM roles));
            SELECT setval('users_id_seq', (SELECT MAX(id) FROM users));
            SELECT setval('products_id_seq', (SELECT MAX(id) FROM products));
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of foreign key dependencies
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM product_categories WHERE product_id <= 5")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM products WHERE id <= 5")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM user_roles WHERE user_id <= 2")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM users WHERE id <= 2")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM roles WHERE id <= 2")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM categories WHERE id <= 3")
            .await?;

        Ok(())
    }
}
