use clap::Parser;
use nacos_mcp::app::App;
use nacos_mcp::config::Settings;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = match Settings::parse().into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("nacos-mcp: {}", err);
            std::process::exit(1);
        }
    };

    let app = match App::initialize(config) {
        Ok(app) => Arc::new(app),
        Err(err) => {
            eprintln!("nacos-mcp: {}", err);
            std::process::exit(1);
        }
    };

    if app.config.warmup {
        app.warmup().await;
    }

    if let Some(addr) = app.config.http_bind {
        let rest_app = app.clone();
        tokio::spawn(async move {
            if let Err(err) = nacos_mcp::http::serve(rest_app.clone(), addr).await {
                rest_app.logger.error(
                    "REST endpoint stopped",
                    Some(&serde_json::json!({ "error": err.message })),
                );
            }
        });
    }

    if let Err(err) = nacos_mcp::mcp::server::run_stdio(app).await {
        eprintln!("nacos-mcp: {}", err);
        std::process::exit(1);
    }
}
