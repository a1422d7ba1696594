use clap::{Parser, Subcommand};

use bunsetsu_cli::commands::{build_ops, config_ops, inspect_ops};

#[derive(Parser)]
#[command(name = "dictool", about = "Bunsetsu dictionary build tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile grammar rule text into a binary graph
    CompileDepgraph {
        /// Dependent-word rule file
        rules_file: String,
        /// Output file
        output_file: String,
        /// Separate independent-word rule file
        #[arg(long)]
        indep: Option<String>,
    },
    /// Show grammar graph statistics
    DepgraphInfo {
        /// Compiled graph file
        graph_file: String,
    },
    /// Compile a word list into a word dictionary
    CompileWords {
        /// Word list (`reading #TAG*freq surface ...` lines)
        text_file: String,
        /// Output file
        output_file: String,
    },
    /// Build a sparse matrix image from `row col value` lines
    MatrixBuild {
        /// Input text file
        text_file: String,
        /// Output image file
        output_file: String,
    },
    /// Look up one cell of a matrix image
    #[command(allow_negative_numbers = true)]
    MatrixPeek {
        /// Matrix image file
        image_file: String,
        row: i32,
        col: i32,
    },
    /// Build a feature frequency table from `neg pos code...` lines
    FeatureTable {
        /// Input text file
        text_file: String,
        /// Output table file
        output_file: String,
    },
    /// Pack sections into a dictionary container
    Pack {
        /// Output container
        output_file: String,
        /// Sections as name=path
        #[arg(required = true)]
        sections: Vec<String>,
    },
    /// Show the sections of a dictionary container
    Info {
        /// Container file
        container: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    bunsetsu_cli::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::CompileDepgraph {
            rules_file,
            output_file,
            indep,
        } => build_ops::compile_depgraph(&rules_file, indep.as_deref(), &output_file),
        Command::DepgraphInfo { graph_file } => inspect_ops::depgraph_info(&graph_file),
        Command::CompileWords {
            text_file,
            output_file,
        } => build_ops::compile_words(&text_file, &output_file),
        Command::MatrixBuild {
            text_file,
            output_file,
        } => build_ops::matrix_build(&text_file, &output_file),
        Command::MatrixPeek {
            image_file,
            row,
            col,
        } => inspect_ops::matrix_peek(&image_file, row, col),
        Command::FeatureTable {
            text_file,
            output_file,
        } => build_ops::feature_table(&text_file, &output_file),
        Command::Pack {
            output_file,
            sections,
        } => build_ops::pack(&output_file, &sections),
        Command::Info { container } => inspect_ops::info(&container),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
