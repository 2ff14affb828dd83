use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use axum_market_api::{
    config::AppConfig,
    db::create_pool,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user_with_role(&pool, "admin@example.com", "admin123", "admin").await?;
    let premium_id =
        ensure_user_with_role(&pool, "premium@example.com", "premium123", "premium").await?;
    let user_id = ensure_user_with_role(&pool, "user@example.com", "user123", "user").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Premium ID: {premium_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Latte", "Espresso with steamed milk", "CF-001", 5.5, 40, "coffee"),
        ("Earl Grey", "Black tea with bergamot", "TE-001", 4.0, 60, "tea"),
        ("Granola Jar", "Oats, honey and almonds", "GR-001", 8.25, 25, "groceries"),
        ("Orange Juice", "Freshly squeezed, 500ml", "JU-001", 3.75, 30, "juices"),
    ];

    for (title, description, code, price, stock, category) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, code, price, stock, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(code)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
