// Booking Gateway Server
//
// Reverse proxy between the room-booking dashboard and the upstream booking API.
// Configuration comes from flags or BOOKING_GATEWAY_* environment variables.

use booking_gateway::{start_server, GatewayConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::parse();

    tracing::info!("[INFO] Starting Booking Gateway on {}", config.bind_addr());
    tracing::info!("[INFO] Available endpoints:");
    tracing::info!("  POST   /api/auth/login              - Authenticate and store credential");
    tracing::info!("  POST   /api/auth/register           - Register and store credential");
    tracing::info!("  POST   /api/auth/logout             - Clear credential");
    tracing::info!("  GET    /api/auth/session            - Credential presence");
    tracing::info!("  GET    /api/auth/guard?path=        - Navigation guard decision");
    tracing::info!("  GET    /api/{{rooms|bookings|categories}}[?id=]");
    tracing::info!("  POST   /api/{{rooms|bookings}}");
    tracing::info!("  PUT    /api/{{rooms|bookings}}?id=");
    tracing::info!("  DELETE /api/{{rooms|bookings}}?id=");

    start_server(config).await?;

    Ok(())
}
