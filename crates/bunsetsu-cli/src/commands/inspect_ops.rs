use std::path::Path;

use bunsetsu_core::depgraph::DepGraph;
use bunsetsu_core::dict::{section, FileDictionary, MemoryWordDictionary};
use bunsetsu_core::feature::{FeatureTable, WeakWords};
use bunsetsu_core::matrix::MatrixImage;

pub fn depgraph_info(graph_file: &str) {
    let graph = die!(
        DepGraph::open(Path::new(graph_file)),
        "Error opening graph: {}"
    );
    println!("rules:       {}", graph.rules().len());
    println!("nodes:       {}", graph.nodes().len());
    println!("branches:    {}", graph.branch_count());
    println!("transitions: {}", graph.transition_count());
}

pub fn matrix_peek(image_file: &str, row: i32, col: i32) {
    let image = die!(
        MatrixImage::open(Path::new(image_file)),
        "Error opening matrix image: {}"
    );
    println!("({row}, {col}) = {}", image.peek(row, col));
}

/// List the sections of a container and decode the known ones.
pub fn info(container: &str) {
    let dic = die!(
        FileDictionary::open(Path::new(container)),
        "Error opening container: {}"
    );
    println!("{container} ({})", if dic.is_mapped() { "mapped" } else { "read" });
    for (name, size) in dic.section_sizes() {
        println!("  {name:<12} {size:>10} bytes");
    }

    if let Some(blob) = dic.section(section::WORD_DIC) {
        let words = die!(
            MemoryWordDictionary::from_bytes(&blob),
            "Error decoding {}: {}",
            section::WORD_DIC
        );
        println!(
            "words:       {} readings, {} entries",
            words.readings().len(),
            words.entry_count()
        );
    }
    if let Some(blob) = dic.section(section::DEP_DIC) {
        let graph = die!(DepGraph::from_bytes(&blob), "Error decoding graph: {}");
        println!(
            "grammar:     {} rules, {} nodes",
            graph.rules().len(),
            graph.nodes().len()
        );
    }
    for name in [section::TRANS_INFO, section::CAND_INFO] {
        if let Some(blob) = dic.section(name) {
            let table = die!(FeatureTable::from_blob(blob), "Error decoding {name}: {}");
            println!("{name:<12} {} rows", table.len());
        }
    }
    if let Some(blob) = dic.section(section::WEAK_WORDS) {
        let weak = die!(WeakWords::from_be_bytes(&blob), "Error decoding weak words: {}");
        println!("weak_words:   {}", weak.len());
    }
    if let Some(blob) = dic.section(section::USE_DIC) {
        let image = die!(MatrixImage::from_blob(blob), "Error decoding use_dic: {}");
        println!(
            "use_dic:      {} row slots, {} cell slots",
            image.row_slots(),
            image.cell_slots()
        );
    }
}
