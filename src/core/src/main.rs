use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};

use omon::configuration::{Args, MonitorConfig};
use omon::control::{connect_first, find_cookie_file, read_cookie, DIAL_TIMEOUT};
use omon::error_handling::types::MonitorError;
use omon::monitor::{Monitor, MonitorOptions};
use omon::output::{AuditLog, ConsoleSink, FanOut, NoticeSink};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();
    if args.no_color {
        ConsoleSink::disable_colors();
    }

    println!("Onion Monitor v{}\n", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config);

    let (audit_log, writer_task) = match AuditLog::open(&args.log_dir).await {
        Ok(opened) => opened,
        Err(e) => {
            println!("{}", e.to_string().red());
            std::process::exit(1);
        }
    };

    let (stream, address) = match connect_first(&config.ports, DIAL_TIMEOUT).await {
        Ok(connected) => connected,
        Err(e) => exit_with_tips(e),
    };
    let cookie = match find_cookie_file(&config.cookie_paths).and_then(|path| read_cookie(&path)) {
        Ok(cookie) => cookie,
        Err(e) => exit_with_tips(e),
    };

    let console: Arc<dyn NoticeSink> = Arc::new(ConsoleSink::new());
    let audit: Arc<dyn NoticeSink> = Arc::new(audit_log.clone());
    let sink: Arc<dyn NoticeSink> = Arc::new(FanOut::new(vec![console, audit]));
    let handle = match Monitor::new(sink, MonitorOptions::default())
        .start(stream, &cookie)
        .await
    {
        Ok(handle) => handle,
        Err(e) => exit_with_tips(e),
    };

    println!("{}", format!("Successfully authenticated on {}", address).green());
    println!("{}", "Monitoring active. Press Ctrl+C to exit.".green());
    println!("{}", format!("Connected to: {}", address).bright_black());
    println!("{}", format!("Log file: {}", audit_log.path().display()).bright_black());

    let shutdown = handle.shutdown_trigger();
    let monitor_task = tokio::spawn(handle.join());
    tokio::pin!(monitor_task);

    let result = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, stopping monitor");
            shutdown.trigger();
            (&mut monitor_task).await
        }
        result = &mut monitor_task => result,
    };

    // The writer task drains once every sender, including the monitor's
    // sink, is gone.
    drop(audit_log);
    if let Err(e) = writer_task.await {
        warn!("Audit log writer ended abnormally: {}", e);
    }

    match result {
        Ok(Ok(())) => info!("Monitor stopped"),
        Ok(Err(MonitorError::TransportLost(e))) => {
            error!("Control connection lost: {}", e);
            std::process::exit(1);
        }
        Ok(Err(e)) => {
            error!("Monitor failed: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Monitor task panicked: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: &Path) -> MonitorConfig {
    match MonitorConfig::write_default(path) {
        Ok(true) => {
            println!(
                "{}",
                format!("Created default configuration file: {}", path.display()).green()
            );
            println!("Please edit this file with your correct paths and ports.");
        }
        Ok(false) => {}
        Err(e) => println!("{}", format!("Note: {}", e).yellow()),
    }

    match MonitorConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            println!(
                "{}",
                format!("Unable to load configuration from {}: {}", path.display(), e).red()
            );
            std::process::exit(1);
        }
    }
}

fn exit_with_tips(e: impl Display) -> ! {
    println!("\n{}", format!("Startup Error: {}", e).red());
    println!("\n{}", "Troubleshooting tips:".yellow());
    println!("1. Make sure the daemon is running with ControlPort enabled");
    println!("2. Check the cookie file paths in the configuration file");
    println!("3. Verify file permissions on the cookie file");
    println!("4. Ensure port 9051 is accessible (the browser bundle's 9151 is excluded)");
    println!("5. Check that the control port listens on localhost");
    std::process::exit(1);
}
