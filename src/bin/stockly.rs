use stockly::cli::{self, StocklyCommand};
use stockly::{config, StocklyError};

fn init_tracing() {
    use tracing_subscriber::{
        filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt as _, Registry,
    };

    Registry::default()
        .with(
            fmt::Layer::new()
                .with_ansi(true)
                .with_file(false)
                .with_line_number(false)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::try_from_env(config::env::LOG_DIRECTIVE)
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn main() {
    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .on_thread_start(|| tracing::trace!("thread start"))
        .on_thread_stop(|| tracing::trace!("thread stop"))
        .enable_io()
        .enable_time()
        .build();

    let code = match runtime {
        Ok(runtime) => runtime.block_on(run()),
        Err(err) => {
            eprintln!("start runtime: {}", err);
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> i32 {
    match run_inner().await {
        Ok(()) => 0,
        Err(err) if err.is_unauthenticated() => {
            tracing::debug!("{}", err);
            eprintln!("unauthenticated");
            2
        }
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}

async fn run_inner() -> Result<(), StocklyError> {
    let StocklyCommand { client, command } = cli::parse();

    let context = cli::authenticate(client).await?;

    command.run(&context).await
}
