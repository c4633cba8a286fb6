//! Resolution of caller gene lists into DEG and background groups

use std::collections::HashSet;

use crate::data::GeneUniverse;
use crate::error::{DegSimError, Result};
use crate::AnalysisParams;

/// DEGs present in the gene universe, in first-seen input order
#[derive(Debug, Clone)]
pub struct DegGroup {
    genes: Vec<String>,
    members: HashSet<String>,
}

impl DegGroup {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.members.contains(gene)
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }
}

/// Genes the DEGs are compared against
#[derive(Debug, Clone)]
pub enum BackgroundGroup {
    /// No background list was given: the whole universe, DEGs included
    Universe { size: usize },
    /// Caller-supplied background, minus DEGs, restricted to the universe
    Explicit {
        genes: Vec<String>,
        members: HashSet<String>,
    },
}

impl BackgroundGroup {
    pub fn len(&self) -> usize {
        match self {
            BackgroundGroup::Universe { size } => *size,
            BackgroundGroup::Explicit { genes, .. } => genes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, BackgroundGroup::Explicit { .. })
    }

    /// Explicit background genes; `None` for the universe default
    pub fn genes(&self) -> Option<&[String]> {
        match self {
            BackgroundGroup::Universe { .. } => None,
            BackgroundGroup::Explicit { genes, .. } => Some(genes),
        }
    }

    /// Whether the comparator should use `gene` as a background observation,
    /// given that it is not a DEG.
    pub fn admits(&self, gene: &str) -> bool {
        match self {
            BackgroundGroup::Universe { .. } => true,
            BackgroundGroup::Explicit { members, .. } => members.contains(gene),
        }
    }
}

/// Keep genes present in the universe, dropping repeats, preserving first-seen order
fn intersect_universe<'a, I>(genes: I, universe: &GeneUniverse) -> (Vec<String>, HashSet<String>)
where
    I: IntoIterator<Item = &'a String>,
{
    let mut members = HashSet::new();
    let kept = genes
        .into_iter()
        .filter(|g| universe.contains(g.as_str()) && members.insert((*g).clone()))
        .cloned()
        .collect();
    (kept, members)
}

/// Partition caller gene lists into a DEG group and a background group.
///
/// DEGs are intersected with `universe` and must number within
/// `[params.min_degs, params.max_degs]`. Without `bkgs` the background is the
/// full universe; otherwise it is `bkgs - degs`, intersected with `universe`.
pub fn resolve(
    degs: &[String],
    bkgs: Option<&[String]>,
    universe: &GeneUniverse,
    params: &AnalysisParams,
) -> Result<(DegGroup, BackgroundGroup)> {
    let (deg_genes, deg_members) = intersect_universe(degs, universe);

    if deg_genes.len() < params.min_degs || deg_genes.len() > params.max_degs {
        return Err(DegSimError::InvalidInput {
            reason: format!(
                "insufficient or excessive DEGs: {} of {} input genes are in the gene universe, \
                 expected between {} and {}",
                deg_genes.len(),
                degs.len(),
                params.min_degs,
                params.max_degs
            ),
        });
    }

    let background = match bkgs {
        None => BackgroundGroup::Universe {
            size: universe.len(),
        },
        Some(bkgs) => {
            let raw_degs: HashSet<&str> = degs.iter().map(|g| g.as_str()).collect();
            let (genes, members) = intersect_universe(
                bkgs.iter().filter(|g| !raw_degs.contains(g.as_str())),
                universe,
            );
            if genes.is_empty() {
                log::warn!("No background genes remain after removing DEGs and genes outside the universe");
            }
            BackgroundGroup::Explicit { genes, members }
        }
    };

    log::info!(
        "DEGs: {} of {} input genes found in the gene universe",
        deg_genes.len(),
        degs.len()
    );
    match (&background, bkgs) {
        (BackgroundGroup::Explicit { genes, .. }, Some(raw)) => log::info!(
            "Background: {} of {} input genes retained",
            genes.len(),
            raw.len()
        ),
        _ => log::info!("Background: full gene universe ({} genes)", background.len()),
    }

    Ok((
        DegGroup {
            genes: deg_genes,
            members: deg_members,
        },
        background,
    ))
}
