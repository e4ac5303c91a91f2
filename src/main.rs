use std::net::SocketAddr;

use dotenvy::dotenv;
use homelink::cli;
use homelink::logging::init_tracing;
use homelink::router::init_router;
use homelink::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("create-admin") => {
            handle_create_admin(args).await;
            return;
        }
        Some("seed") => {
            let pool = cli_db_pool().await;
            match cli::seeder::seed(&pool).await {
                Ok(()) => println!("✅ Demo data seeded (accounts use password123)"),
                Err(e) => {
                    eprintln!("❌ Seeding failed: {}", e);
                    std::process::exit(1);
                }
            }
            return;
        }
        Some("purge") => {
            let pool = cli_db_pool().await;
            match cli::purge(&pool).await {
                Ok((notifications, messages)) => {
                    println!("✅ Purged {} expired notifications", notifications);
                    println!("✅ Purged {} fully deleted messages", messages);
                }
                Err(e) => {
                    eprintln!("❌ Purge failed: {}", e);
                    std::process::exit(1);
                }
            }
            return;
        }
        _ => {}
    }

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    println!("🚀 Server running on http://localhost:{}", port);
    println!("📚 Swagger UI available at http://localhost:{}/swagger-ui", port);
    println!("📖 Scalar UI available at http://localhost:{}/scalar", port);

    // ConnectInfo feeds the rate limiter's peer-IP key extractor.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

async fn handle_create_admin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!("Usage: {} create-admin <name> <email> <password>", args[0]);
        std::process::exit(1);
    }

    let name = &args[2];
    let email = &args[3];
    let password = &args[4];

    let pool = cli_db_pool().await;

    match cli::create_admin(&pool, name, email, password).await {
        Ok(()) => {
            println!("✅ Admin created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn cli_db_pool() -> sqlx::PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
