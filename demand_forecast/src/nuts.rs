//! NUTS administrative region tree
//!
//! A country node (e.g. `DE`) owns NUTS1 branches (`DE1`), which own NUTS2
//! leaves (`DE11`). Each level adds exactly one character to the code, so a
//! node's parent is found by prefix. Leaves carry a [`Series`]; branches sum
//! their children.
//!
//! A branch's historical series is either supplied at construction or the
//! year-aligned sum of its children's, computed on first read and cached.
//! [`NutsRegion::insert`] clears the computed caches along its path, so the
//! cache never outlives a change of the tree shape.

use crate::error::{ForecastError, Result};
use crate::strategy::Series;
use crate::timeseries::Timeseries;
use std::cell::OnceCell;
use tracing::trace;

/// Payload of a region node
#[derive(Debug, Clone)]
pub enum RegionNode {
    Leaf(Series),
    Branch(Vec<NutsRegion>),
}

/// A node of the region tree, keyed by its NUTS code
#[derive(Debug, Clone)]
pub struct NutsRegion {
    code: String,
    node: RegionNode,
    historical: OnceCell<Timeseries>,
    historical_supplied: bool,
}

impl NutsRegion {
    /// Empty branch, typically the country root
    pub fn branch(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            node: RegionNode::Branch(Vec::new()),
            historical: OnceCell::new(),
            historical_supplied: false,
        }
    }

    /// Branch whose historical series is given rather than summed from its children
    pub fn branch_with_historical(code: impl Into<String>, historical: Timeseries) -> Self {
        Self {
            historical: OnceCell::from(historical),
            historical_supplied: true,
            ..Self::branch(code)
        }
    }

    pub fn leaf(code: impl Into<String>, series: Series) -> Self {
        Self {
            code: code.into(),
            node: RegionNode::Leaf(series),
            historical: OnceCell::new(),
            historical_supplied: false,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// NUTS level: 0 for a two-letter country code, one more per extra character
    pub fn nuts_level(&self) -> usize {
        self.code.len().saturating_sub(2)
    }

    pub fn node(&self) -> &RegionNode {
        &self.node
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node, RegionNode::Leaf(_))
    }

    /// The leaf payload, `None` for branches
    pub fn series(&self) -> Option<&Series> {
        match &self.node {
            RegionNode::Leaf(series) => Some(series),
            RegionNode::Branch(_) => None,
        }
    }

    /// Immediate children in insertion order; empty for leaves
    pub fn children(&self) -> &[NutsRegion] {
        match &self.node {
            RegionNode::Leaf(_) => &[],
            RegionNode::Branch(children) => children,
        }
    }

    /// Place `region` below this node, creating missing intermediate branches.
    ///
    /// The region's code must extend this node's code by at least one
    /// character. Inserting a branch whose code already exists merges it into
    /// the existing branch; inserting an existing leaf fails.
    pub fn insert(&mut self, region: NutsRegion) -> Result<()> {
        let depth = self.code.len();
        let well_formed = region.code.len() > depth
            && region.code.starts_with(&self.code)
            && region.code.bytes().all(|b| b.is_ascii_alphanumeric());
        if !well_formed {
            return Err(ForecastError::MalformedRegionCode {
                parent: self.code.clone(),
                code: region.code,
            });
        }

        let children = match &mut self.node {
            RegionNode::Leaf(_) => return Err(ForecastError::LeafHasNoChildren(self.code.clone())),
            RegionNode::Branch(children) => children,
        };
        if !self.historical_supplied {
            self.historical.take();
        }

        if region.code.len() == depth + 1 {
            return match children.iter_mut().find(|child| child.code == region.code) {
                Some(existing) => existing.absorb(region),
                None => {
                    children.push(region);
                    Ok(())
                }
            };
        }

        let parent_code = region.code[..=depth].to_string();
        let index = match children.iter().position(|child| child.code == parent_code) {
            Some(index) => index,
            None => {
                trace!(parent = %self.code, branch = %parent_code, "creating intermediate region");
                children.push(NutsRegion::branch(parent_code));
                children.len() - 1
            }
        };
        children[index].insert(region)
    }

    fn absorb(&mut self, other: NutsRegion) -> Result<()> {
        let grandchildren = match other.node {
            RegionNode::Branch(grandchildren) if !self.is_leaf() => grandchildren,
            _ => return Err(ForecastError::DuplicateRegion(other.code)),
        };

        // Merged on a copy so a failing grandchild leaves `self` untouched
        let mut merged = self.clone();
        if other.historical_supplied {
            merged.historical = other.historical;
            merged.historical_supplied = true;
        }
        for child in grandchildren {
            merged.insert(child)?;
        }
        *self = merged;
        Ok(())
    }

    /// Node with exactly `code`, searched along the prefix path
    pub fn find(&self, code: &str) -> Option<&NutsRegion> {
        if self.code == code {
            return Some(self);
        }
        self.children()
            .iter()
            .find(|child| code.starts_with(child.code.as_str()))
            .and_then(|child| child.find(code))
    }

    /// Historical series of this node: the leaf's own, or the children's year-aligned sum.
    ///
    /// For branches the sum only keeps years present in every child. A branch
    /// with neither children nor a supplied series fails with
    /// [`ForecastError::EmptyRegion`].
    pub fn historical_series(&self) -> Result<&Timeseries> {
        let children = match &self.node {
            RegionNode::Leaf(series) => return Ok(series.historical()),
            RegionNode::Branch(children) => children,
        };
        if let Some(cached) = self.historical.get() {
            return Ok(cached);
        }
        if children.is_empty() {
            return Err(ForecastError::EmptyRegion(self.code.clone()));
        }

        let mut sum: Option<Timeseries> = None;
        for child in children {
            let series = child.historical_series()?;
            match sum.as_mut() {
                Some(total) => {
                    total.add(series);
                }
                None => sum = Some(Timeseries::new(series.data().iter().copied())),
            }
        }

        Ok(self.historical.get_or_init(|| sum.unwrap_or_default()))
    }

    /// Whether the branch aggregate has already been computed or supplied
    pub fn has_cached_historical(&self) -> bool {
        self.historical.get().is_some()
    }

    /// Historical value at `year`
    pub fn get_historical_value(&self, year: f64) -> Result<f64> {
        self.historical_series()?.get_value_at_year(year)
    }

    /// Forecast value at `x`; branches sum their children.
    ///
    /// A branch without children fails with [`ForecastError::EmptyRegion`]
    /// rather than reporting zero.
    pub fn get_forecast_value(&self, x: f64) -> Result<f64> {
        match &self.node {
            RegionNode::Leaf(series) => series.get_forecast_value(x),
            RegionNode::Branch(children) if children.is_empty() => {
                Err(ForecastError::EmptyRegion(self.code.clone()))
            }
            RegionNode::Branch(children) => children
                .iter()
                .map(|child| child.get_forecast_value(x))
                .sum(),
        }
    }

    /// Historical value before `last_available_year`, forecast value from it onwards
    pub fn get_value(&self, x: f64, last_available_year: f64) -> Result<f64> {
        if x < last_available_year {
            self.get_historical_value(x)
        } else {
            self.get_forecast_value(x)
        }
    }

    /// All leaves, depth first
    pub fn get_all_leaf_nodes(&self) -> Vec<&NutsRegion> {
        self.get_nodes_dfs()
            .into_iter()
            .filter(|node| node.is_leaf())
            .collect()
    }

    /// All nodes in pre-order: each node before its children, children in insertion order
    pub fn get_nodes_dfs(&self) -> Vec<&NutsRegion> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children().iter().rev());
        }
        nodes
    }

    /// Each leaf's share of the summed leaf values at `x`
    pub fn leaf_shares(&self, x: f64, last_available_year: f64) -> Result<Vec<(&str, f64)>> {
        let values = self
            .get_all_leaf_nodes()
            .into_iter()
            .map(|leaf| {
                leaf.get_value(x, last_available_year)
                    .map(|value| (leaf.code(), value))
            })
            .collect::<Result<Vec<_>>>()?;

        let total: f64 = values.iter().map(|(_, value)| value).sum();
        if total == 0.0 || !total.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "Cannot derive shares below {} from a total of {}",
                self.code, total
            )));
        }

        Ok(values
            .into_iter()
            .map(|(code, value)| (code, value / total))
            .collect())
    }
}
