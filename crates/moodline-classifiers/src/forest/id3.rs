//! Random forest of ID3 decision trees over boolean feature attributes
//!
//! Every attribute is "feature present in the text". Trees are grown on
//! bootstrap subsamples in parallel and stored as flat node arenas.

use crate::config::{ForestConfig, MAX_TREE_DEPTH};
use crate::features::FeatureSet;
use moodline_core::{Error, Result, Sentiment};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Minimum information gain for a split to be worth making
const MIN_GAIN: f64 = 1e-12;

/// Per-class sample counts, indexed like `Sentiment::CANONICAL_ORDER`
type ClassCounts = [usize; 3];

/// Class distribution at a leaf
pub type Distribution = BTreeMap<Sentiment, f64>;

/// A training sample reduced to its feature set
#[derive(Debug, Clone)]
pub struct FeatureSample {
    pub features: FeatureSet,
    pub class: Sentiment,
}

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Terminal node holding the class distribution of its samples
    Leaf { distribution: Distribution },

    /// Branch on the presence of `feature`; children are arena indices
    Split {
        feature: String,
        present: usize,
        absent: usize,
    },
}

/// Decision tree stored as a node arena; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Grow a tree with ID3 on the given samples
    pub fn grow(samples: &[&FeatureSample], max_depth: usize) -> Self {
        let mut nodes = Vec::new();
        grow_node(&mut nodes, samples, 0, max_depth);
        Self { nodes }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Class distribution of the leaf reached by `features`
    pub fn class_distribution(&self, features: &FeatureSet) -> &Distribution {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    present,
                    absent,
                } => {
                    index = if features.contains(feature) {
                        *present
                    } else {
                        *absent
                    };
                }
            }
        }
    }

    /// Check arena structure so that traversal always terminates in bounds
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::invalid_input("decision tree has no nodes"));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                present, absent, ..
            } = node
            {
                for child in [*present, *absent] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(Error::invalid_input(format!(
                            "decision tree node {index} has invalid child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    /// Build a forest; each tree sees a bootstrap subsample of `samples`
    pub fn build(samples: &[FeatureSample], config: &ForestConfig) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::invalid_input("cannot build a forest from zero samples"));
        }
        if config.trees == 0 {
            return Err(Error::invalid_input("forest needs at least one tree"));
        }
        if config.max_depth > MAX_TREE_DEPTH {
            return Err(Error::invalid_input(format!(
                "tree depth {} exceeds the limit of {MAX_TREE_DEPTH}",
                config.max_depth
            )));
        }

        let subsample = config.subsample_for(samples.len());
        info!(
            "Building forest of {} trees ({} samples per tree, max depth {})",
            config.trees, subsample, config.max_depth
        );

        let trees: Vec<Tree> = (0..config.trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let bootstrap: Vec<&FeatureSample> = (0..subsample)
                    .map(|_| &samples[rng.gen_range(0..samples.len())])
                    .collect();
                let tree = Tree::grow(&bootstrap, config.max_depth);
                debug!("Tree {} grown with {} nodes", i, tree.node_count());
                tree
            })
            .collect();

        Ok(Self { trees })
    }

    /// Number of trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether the forest has no trees
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Average class distribution over all trees
    pub fn class_distribution(&self, features: &FeatureSet) -> Distribution {
        let mut total = Distribution::new();
        for tree in &self.trees {
            for (class, prob) in tree.class_distribution(features) {
                *total.entry(*class).or_insert(0.0) += prob;
            }
        }

        let count = self.trees.len().max(1) as f64;
        for prob in total.values_mut() {
            *prob /= count;
        }
        total
    }

    /// Validate every tree
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::invalid_input("forest has no trees"));
        }
        self.trees.iter().try_for_each(Tree::validate)
    }
}

fn class_index(class: Sentiment) -> usize {
    match class {
        Sentiment::Neutral => 0,
        Sentiment::Negative => 1,
        Sentiment::Positive => 2,
    }
}

fn count_classes(samples: &[&FeatureSample]) -> ClassCounts {
    let mut counts = [0; 3];
    for sample in samples {
        counts[class_index(sample.class)] += 1;
    }
    counts
}

fn entropy(counts: &ClassCounts) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn leaf(counts: &ClassCounts) -> Node {
    let total: usize = counts.iter().sum();
    let distribution = Sentiment::CANONICAL_ORDER
        .iter()
        .zip(counts.iter())
        .filter(|&(_, &count)| count > 0)
        .map(|(class, &count)| (*class, count as f64 / total as f64))
        .collect();
    Node::Leaf { distribution }
}

/// Feature with the highest information gain, ties going to the
/// lexicographically smaller feature
fn best_split(samples: &[&FeatureSample], parent: &ClassCounts) -> Option<String> {
    let mut present_counts: BTreeMap<&str, ClassCounts> = BTreeMap::new();
    for sample in samples {
        let index = class_index(sample.class);
        for feature in &sample.features {
            present_counts.entry(feature.as_str()).or_insert([0; 3])[index] += 1;
        }
    }

    let total = samples.len();
    let parent_entropy = entropy(parent);
    let mut best: Option<(&str, f64)> = None;

    for (feature, present) in &present_counts {
        let with: usize = present.iter().sum();
        if with == total {
            continue;
        }
        let absent = [
            parent[0] - present[0],
            parent[1] - present[1],
            parent[2] - present[2],
        ];
        let without = total - with;

        let remainder = (with as f64 * entropy(present) + without as f64 * entropy(&absent))
            / total as f64;
        let gain = parent_entropy - remainder;

        if gain > MIN_GAIN && best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((*feature, gain));
        }
    }

    best.map(|(feature, _)| feature.to_string())
}

fn grow_node(
    nodes: &mut Vec<Node>,
    samples: &[&FeatureSample],
    depth: usize,
    max_depth: usize,
) -> usize {
    let index = nodes.len();
    let counts = count_classes(samples);
    let classes = counts.iter().filter(|&&c| c > 0).count();

    if classes <= 1 || depth >= max_depth {
        nodes.push(leaf(&counts));
        return index;
    }

    let Some(feature) = best_split(samples, &counts) else {
        nodes.push(leaf(&counts));
        return index;
    };

    // Reserve the slot so children get larger indices than their parent.
    nodes.push(leaf(&counts));
    let (with, without): (Vec<&FeatureSample>, Vec<&FeatureSample>) = samples
        .iter()
        .copied()
        .partition(|sample| sample.features.contains(&feature));

    let present = grow_node(nodes, &with, depth + 1, max_depth);
    let absent = grow_node(nodes, &without, depth + 1, max_depth);
    nodes[index] = Node::Split {
        feature,
        present,
        absent,
    };

    index
}
