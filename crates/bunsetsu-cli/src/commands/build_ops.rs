use std::fs;
use std::path::Path;

use bunsetsu_core::depgraph::GraphBuilder;
use bunsetsu_core::dict::{FileDictionaryBuilder, MemoryWordDictionary};
use bunsetsu_core::feature::FeatureTableBuilder;
use bunsetsu_core::matrix::SparseMatrix;
use tracing::info;

use crate::text::{parse_matrix_text, parse_section_spec};

fn report_written(output_file: &str) {
    let size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!("Wrote {output_file} ({size} bytes)");
}

/// Compile grammar rule text into a binary graph. Independent-word rules
/// may come from a separate file.
pub fn compile_depgraph(rules_file: &str, indep_file: Option<&str>, output_file: &str) {
    let mut builder = GraphBuilder::new();
    if let Some(path) = indep_file {
        die!(
            builder.add_file(Path::new(path)),
            "Error reading {path}: {}"
        );
    }
    die!(
        builder.add_file(Path::new(rules_file)),
        "Error reading {rules_file}: {}"
    );
    let graph = builder.build();
    info!(
        rules = graph.rules().len(),
        nodes = graph.nodes().len(),
        "compiled grammar"
    );
    die!(
        graph.save(Path::new(output_file)),
        "Error writing graph: {}"
    );
    report_written(output_file);
}

pub fn compile_words(text_file: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(text_file),
        "Error reading {text_file}: {}"
    );
    let dic = die!(
        MemoryWordDictionary::from_text(&text),
        "Error parsing word list: {}"
    );
    eprintln!(
        "{} readings, {} entries",
        dic.readings().len(),
        dic.entry_count()
    );
    die!(
        dic.save(Path::new(output_file)),
        "Error writing word dictionary: {}"
    );
    report_written(output_file);
}

pub fn matrix_build(text_file: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(text_file),
        "Error reading {text_file}: {}"
    );
    let cells = die!(parse_matrix_text(&text), "Error: {}");
    let mut matrix = SparseMatrix::<()>::new();
    for (row, col, value) in cells {
        matrix.set(row, col, value, None);
    }
    eprintln!(
        "{} rows, {} cells",
        matrix.row_count(),
        matrix.cell_count()
    );
    let image = die!(matrix.to_image(), "Error building matrix: {}");
    die!(
        fs::write(output_file, image.to_be_bytes()),
        "Error writing {output_file}: {}"
    );
    report_written(output_file);
}

pub fn feature_table(text_file: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(text_file),
        "Error reading {text_file}: {}"
    );
    let table = die!(
        FeatureTableBuilder::from_text(&text),
        "Error parsing feature counts: {}"
    );
    eprintln!("{} rows", table.len());
    die!(
        fs::write(output_file, table.to_be_bytes()),
        "Error writing {output_file}: {}"
    );
    report_written(output_file);
}

/// Pack `name=path` sections into one container.
pub fn pack(output_file: &str, sections: &[String]) {
    let mut builder = FileDictionaryBuilder::new();
    for spec in sections {
        let (name, path) = die!(parse_section_spec(spec), "Error: {}");
        let contents = die!(fs::read(path), "Error reading {path}: {}");
        eprintln!("  {name}: {} bytes", contents.len());
        builder.add(name, contents);
    }
    die!(
        builder.save(Path::new(output_file)),
        "Error writing container: {}"
    );
    report_written(output_file);
}
