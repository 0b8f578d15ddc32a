use clap::{Parser, Subcommand};

/// `Streamgate` - secured webhook exchange with streamed bot answers.
#[derive(Parser, Debug)]
#[command(name = "streamgate")]
#[command(version)]
#[command(about = "Encrypted callback gateway for conversational bots.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the callback gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print a fresh 43-character encoding key
    Keygen,

    /// Decrypt a callback envelope with the configured key
    Decrypt {
        /// Base64 ciphertext (the `encrypt` field of a callback)
        #[arg(long)]
        ciphertext: String,

        /// Expected recipient id (default: `receive_id` from config)
        #[arg(long)]
        receive_id: Option<String>,
    },
}
