//! Category selectors deciding which similarity columns are analysed

use std::fmt;
use std::str::FromStr;

use crate::error::{DegSimError, Result};

/// Pathway collection bundled in the combined C2 canonical-pathway matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathwaySource {
    Biocarta,
    Kegg,
    Pid,
    Reactome,
    WikiPathways,
}

impl PathwaySource {
    pub const ALL: [PathwaySource; 5] = [
        PathwaySource::Biocarta,
        PathwaySource::Kegg,
        PathwaySource::Pid,
        PathwaySource::Reactome,
        PathwaySource::WikiPathways,
    ];

    /// Column-name prefix of this source in the pathway matrix
    pub fn tag(&self) -> &'static str {
        match self {
            PathwaySource::Biocarta => "BIOCARTA",
            PathwaySource::Kegg => "KEGG",
            PathwaySource::Pid => "PID",
            PathwaySource::Reactome => "REACTOME",
            PathwaySource::WikiPathways => "WP",
        }
    }
}

/// Which functions a run compares the DEGs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// GO biological process terms
    GoBp,
    /// Every canonical pathway across all sources
    PathwaysAll,
    /// Pathways from a single source
    Pathway(PathwaySource),
    /// Drug mechanisms of action
    Moa,
    /// Caller-supplied function embeddings
    Customized,
}

impl Category {
    /// Every selector recognised on the command line, in display order
    pub fn all() -> Vec<Category> {
        let mut all = vec![Category::GoBp, Category::PathwaysAll];
        all.extend(PathwaySource::ALL.iter().map(|&s| Category::Pathway(s)));
        all.push(Category::Moa);
        all.push(Category::Customized);
        all
    }

    /// Canonical selector name
    pub fn name(&self) -> &'static str {
        match self {
            Category::GoBp => "GOBP",
            Category::PathwaysAll => "C2CP_ALL",
            Category::Pathway(source) => source.tag(),
            Category::Moa => "MOA",
            Category::Customized => "CUSTOMIZED",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Category::GoBp => "Gene Ontology biological processes",
            Category::PathwaysAll => "All canonical pathways (BioCarta, KEGG, PID, Reactome, WikiPathways)",
            Category::Pathway(PathwaySource::Biocarta) => "BioCarta pathways",
            Category::Pathway(PathwaySource::Kegg) => "KEGG pathways",
            Category::Pathway(PathwaySource::Pid) => "PID pathways",
            Category::Pathway(PathwaySource::Reactome) => "Reactome pathways",
            Category::Pathway(PathwaySource::WikiPathways) => "WikiPathways",
            Category::Moa => "Drug mechanisms of action",
            Category::Customized => "User-supplied function embeddings",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = DegSimError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(DegSimError::InvalidInput {
                reason: "Category must not be empty".to_string(),
            });
        }

        let category = match name.to_ascii_uppercase().as_str() {
            "GOBP" => Category::GoBp,
            "C2CP_ALL" | "C2CP" => Category::PathwaysAll,
            "BIOCARTA" => Category::Pathway(PathwaySource::Biocarta),
            "KEGG" => Category::Pathway(PathwaySource::Kegg),
            "PID" => Category::Pathway(PathwaySource::Pid),
            "REACTOME" => Category::Pathway(PathwaySource::Reactome),
            "WP" | "WIKIPATHWAYS" => Category::Pathway(PathwaySource::WikiPathways),
            "MOA" => Category::Moa,
            "CUSTOMIZED" => Category::Customized,
            _ => {
                return Err(DegSimError::UnknownCategory {
                    name: name.to_string(),
                })
            }
        };
        Ok(category)
    }
}
