//! Variant fields joined into groups of interchangeable characters.
//!
//! Every `kXxxVariant` value lists `U+XXXX` targets, each optionally tagged
//! with its sources after `<` (`U+4E7E<kMatthews,kMeyerWempe`). A target
//! produces a forward link from the line's character and a mirrored back
//! link, so the groups are the connected components of an undirected graph.

use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use crate::fields::{for_each_field, parse_code_point, read, UnihanLineError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantLink {
    pub from: char,
    pub to: char,
    /// Field the link came from, e.g. `kSemanticVariant`.
    pub field: String,
    pub tag: String,
    /// `true` on the link as written, `false` on its mirror.
    pub forward: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantGroup {
    /// Members in the order the sweep reached them.
    pub chars: Vec<char>,
    /// Every link of every member, forward and mirrored.
    pub links: Vec<VariantLink>,
}

impl VariantGroup {
    /// Links as written in the data.
    pub fn forward_links(&self) -> impl Iterator<Item = &VariantLink> {
        self.links.iter().filter(|l| l.forward)
    }

    pub fn pair_count(&self) -> usize {
        self.links.len() / 2
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariantGraph {
    order: Vec<char>,
    links: AHashMap<char, Vec<VariantLink>>,
    /// Line counts of fields that are not variant fields.
    pub field_totals: BTreeMap<String, usize>,
    pub errors: Vec<(usize, UnihanLineError)>,
}

impl VariantGraph {
    pub fn from_text(text: &str) -> Self {
        let mut graph = VariantGraph::default();
        let errors = for_each_field(text, |line| {
            if !line.field.ends_with("Variant") {
                *graph.field_totals.entry(line.field.to_string()).or_default() += 1;
                return;
            }
            for target in line.value.split(' ').filter(|t| !t.is_empty()) {
                let (cp, tag) = target.split_once('<').unwrap_or((target, ""));
                match parse_code_point(cp) {
                    Ok(to) => graph.link(line.ch, to, line.field, tag),
                    Err(err) => {
                        tracing::warn!(ch = %line.ch, field = line.field, error = %err, "skipping variant target")
                    }
                }
            }
        });
        graph.errors = errors;
        tracing::debug!(chars = graph.order.len(), "variant graph loaded");
        graph
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_text(&read(path)?))
    }

    fn link(&mut self, from: char, to: char, field: &str, tag: &str) {
        let forward = VariantLink {
            from,
            to,
            field: field.to_string(),
            tag: tag.to_string(),
            forward: true,
        };
        let back = VariantLink {
            from: to,
            to: from,
            forward: false,
            ..forward.clone()
        };
        self.push(forward);
        self.push(back);
    }

    fn push(&mut self, link: VariantLink) {
        let list = self.links.entry(link.from).or_insert_with(|| {
            self.order.push(link.from);
            Vec::new()
        });
        list.push(link);
    }

    pub fn links(&self, ch: char) -> &[VariantLink] {
        self.links.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Connected groups, started in first-appearance order and stably sorted
    /// by ascending link count.
    pub fn groups(&self) -> Vec<VariantGroup> {
        let mut marked: AHashSet<char> = AHashSet::with_capacity(self.order.len());
        let mut groups = Vec::new();
        for &start in &self.order {
            if !marked.insert(start) {
                continue;
            }
            let mut group = VariantGroup::default();
            let mut queue = VecDeque::from([start]);
            while let Some(ch) = queue.pop_front() {
                group.chars.push(ch);
                for link in self.links(ch) {
                    group.links.push(link.clone());
                    if marked.insert(link.to) {
                        queue.push_back(link.to);
                    }
                }
            }
            groups.push(group);
        }
        groups.sort_by_key(|g| g.links.len());
        groups
    }
}
