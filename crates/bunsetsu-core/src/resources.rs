//! Read-only data shared by every conversion session.

use std::path::Path;

use tracing::{debug, debug_span};

use crate::depgraph::DepGraph;
use crate::dict::{section, FileDictionary, MemoryWordDictionary, WordDictionary};
use crate::error::EngineError;
use crate::feature::{FeatureTable, WeakWords};
use crate::matrix::MatrixImage;

/// Grammar graph, word dictionary and statistics tables.
///
/// Immutable after loading; wrap in an `Arc` to share it between sessions.
pub struct Resources {
    pub words: Box<dyn WordDictionary>,
    pub graph: DepGraph,
    /// Lattice transition statistics.
    pub trans_info: FeatureTable,
    /// Meta-word ordering statistics.
    pub cand_info: FeatureTable,
    pub weak_words: WeakWords,
    /// Word co-occurrence image; absent in containers built without one.
    pub use_dic: Option<MatrixImage>,
}

impl Resources {
    pub fn new(words: Box<dyn WordDictionary>, graph: DepGraph) -> Self {
        Self {
            words,
            graph,
            trans_info: FeatureTable::empty(),
            cand_info: FeatureTable::empty(),
            weak_words: WeakWords::default(),
            use_dic: None,
        }
    }

    /// Decode every section of a dictionary container.
    ///
    /// `word_dic` and `dep_dic` are required; missing statistics sections
    /// leave the corresponding table empty.
    pub fn from_container(dic: &FileDictionary) -> Result<Self, EngineError> {
        let _span = debug_span!("load_resources").entered();
        let words = MemoryWordDictionary::from_bytes(&dic.require(section::WORD_DIC)?)?;
        let graph = DepGraph::from_bytes(&dic.require(section::DEP_DIC)?)?;
        let trans_info = match dic.section(section::TRANS_INFO) {
            Some(blob) => FeatureTable::from_blob(blob)?,
            None => FeatureTable::empty(),
        };
        let cand_info = match dic.section(section::CAND_INFO) {
            Some(blob) => FeatureTable::from_blob(blob)?,
            None => FeatureTable::empty(),
        };
        let weak_words = match dic.section(section::WEAK_WORDS) {
            Some(blob) => WeakWords::from_be_bytes(&blob)?,
            None => WeakWords::default(),
        };
        let use_dic = dic
            .section(section::USE_DIC)
            .map(MatrixImage::from_blob)
            .transpose()?;
        debug!(
            readings = words.len(),
            rules = graph.rules().len(),
            nodes = graph.nodes().len(),
            trans_rows = trans_info.len(),
            cand_rows = cand_info.len(),
            weak_words = weak_words.len(),
            use_dic = use_dic.is_some(),
            "loaded resources"
        );
        Ok(Self {
            words: Box::new(words),
            graph,
            trans_info,
            cand_info,
            weak_words,
            use_dic,
        })
    }

    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let dic = FileDictionary::open(path)?;
        Self::from_container(&dic)
    }
}
