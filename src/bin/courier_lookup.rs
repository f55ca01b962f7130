use clap::Parser;
use courier_ratio::config::{API_KEY_ENV, DEFAULT_BASE_URL};
use courier_ratio::domain::phone::INVALID_PHONE_MESSAGE;
use courier_ratio::utils::error::ErrorCategory;
use courier_ratio::utils::logger::{self, LogFormat};
use courier_ratio::{
    CheckError, CheckReport, CourierApi, GatewayConfig, PhoneNumber, UpstreamGateway,
};

#[derive(Parser)]
#[command(name = "courier-lookup")]
#[command(about = "Look up courier delivery history and fraud risk for a BD mobile number")]
struct Args {
    /// Phone number in any common format, e.g. +8801730285500
    phone: String,

    /// Upstream base address
    #[arg(long, env = "BDCOURIER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Upstream bearer credential
    #[arg(long, env = "BDCOURIER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn exit_code(err: &CheckError) -> i32 {
    match err.category() {
        ErrorCategory::InvalidInput => 2,
        ErrorCategory::UpstreamLogical => 4,
        ErrorCategory::UpstreamAuth | ErrorCategory::UpstreamFault => 5,
        ErrorCategory::Configuration => 3,
    }
}

fn fail(err: CheckError) -> ! {
    tracing::error!("❌ Lookup failed: {} (Category: {:?})", err, err.category());
    eprintln!("❌ {}", err.public_message());
    std::process::exit(exit_code(&err));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(LogFormat::Compact, args.verbose);

    let Some(phone) = PhoneNumber::normalize(&args.phone) else {
        fail(CheckError::InvalidPhone {
            message: INVALID_PHONE_MESSAGE.to_string(),
        });
    };
    if args.phone.trim() != phone.as_str() {
        println!("📱 Normalized {} → {}", args.phone.trim(), phone);
    }

    let gateway = match UpstreamGateway::new(GatewayConfig::new(args.base_url, args.api_key)) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("💡 Set {} or pass --api-key", API_KEY_ENV);
            fail(e);
        }
    };

    let (plan, check) = tokio::join!(gateway.my_plan(), gateway.courier_check(&phone));

    // Quota is informational; a failure here does not block the lookup.
    match plan {
        Ok(plan) => {
            if let Some(quota) = plan.plan() {
                tracing::debug!("Plan: {:?}", quota);
                println!("🔑 Remaining calls: {}", quota.remaining_calls());
            }
        }
        Err(e) => tracing::warn!("Plan lookup failed: {}", e),
    }

    let response = check.unwrap_or_else(|e| fail(e));
    let report = CheckReport::build(phone, &response);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({}% success over {} parcels, {} cancelled)",
        report.risk.icon(),
        report.risk.label(),
        report.summary.success_ratio,
        report.summary.total_parcel,
        report.summary.cancelled_parcel
    );
    for courier in report.active_couriers() {
        println!(
            "  {:<10} {:>5}/{:<5} delivered  {:>6}%  {}",
            courier.stat.name,
            courier.stat.success_parcel,
            courier.stat.total_parcel,
            courier.stat.success_ratio,
            courier.risk.label()
        );
    }
    let idle = report.couriers.len() - report.active_couriers().count();
    if idle > 0 {
        println!("  ({} other courier(s) with no parcels)", idle);
    }
    if report.reports_count > 0 {
        println!("📝 {} fraud report(s) on file", report.reports_count);
    }

    Ok(())
}
