use clap::Parser;

#[derive(Parser, Debug)]
#[command(version = env!("APP_VERSION"), about, long_about = None)]
pub struct Cli {
    #[arg(
        short = 'l',
        long,
        default_value = "127.0.0.1:8000",
        help = "Listen address for the edge router."
    )]
    pub listen_addr: String,

    #[arg(
        short = 'f',
        long,
        env = "FRONTEND_ORIGIN",
        help = "Base origin of the static frontend host, e.g. http://frontend.internal"
    )]
    pub frontend_origin: String,

    #[arg(
        short = 'b',
        long,
        env = "BACKEND_ORIGIN",
        help = "Base origin of the backend API host, e.g. https://api.internal"
    )]
    pub backend_origin: String,
}
