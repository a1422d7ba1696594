use clap::{Parser, Subcommand};

use bunsetsu_cli::commands::session_ops;

#[derive(Parser)]
#[command(name = "segtool", about = "Bunsetsu conversion diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a kana reading into segments and show the first candidates
    Segment {
        /// Dictionary container
        container: String,
        /// Kana input
        kana: String,
        /// Learning store (optional)
        #[arg(long)]
        history: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every ranked candidate of every segment
    Candidates {
        /// Dictionary container
        container: String,
        /// Kana input
        kana: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Convert, choose candidates and learn from the result
    Commit {
        /// Dictionary container
        container: String,
        /// Kana input
        kana: String,
        /// Learning store, created if missing
        store: String,
        /// Candidate index per segment, comma separated
        #[arg(long)]
        choose: Option<String>,
    },
}

fn main() {
    bunsetsu_cli::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Segment {
            container,
            kana,
            history,
            json,
        } => session_ops::segment_cmd(&container, &kana, history.as_deref(), json),
        Command::Candidates {
            container,
            kana,
            json,
        } => session_ops::candidates_cmd(&container, &kana, json),
        Command::Commit {
            container,
            kana,
            store,
            choose,
        } => session_ops::commit_cmd(&container, &kana, &store, choose.as_deref()),
    }
}
