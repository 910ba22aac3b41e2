//! Structural signatures over the decomposition graph.
//!
//! The graph may contain cycles through intermediate keys (bad data, or a
//! merge that pointed a key at one of its own descendants), so every walk
//! carries the path of keys it is currently inside plus a depth bound. A key
//! that is revisited, or reached beyond the bound, is rendered literally.

use ahash::AHashSet;
use ideograph_dsl::key::{is_intermediate, sort_keys};
use serde::Serialize;

use crate::store::DecompStore;

/// Depth used for the full expansion report.
pub const EXPANSION_DEPTH: usize = 99;

/// Depth bound for the tag, owner-tag and flatten walks.
const MAX_WALK_DEPTH: usize = 128;

/// Keys on the current recursion path.
struct Walk<'a> {
    path: Vec<&'a str>,
}

impl<'a> Walk<'a> {
    fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Enter `key`; `false` when it is already on the path or too deep.
    fn enter(&mut self, key: &'a str) -> bool {
        if self.path.len() >= MAX_WALK_DEPTH || self.path.contains(&key) {
            tracing::debug!(key = %key, depth = self.path.len(), "cut recursive walk");
            return false;
        }
        self.path.push(key);
        true
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

/// Levels produced by [`DecompStore::bottom_up`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BottomUp {
    /// Every key without components, in enumeration order.
    pub core: Vec<String>,
    /// `levels[i]` is level `i + 1`, in domain order.
    pub levels: Vec<Vec<String>>,
}

impl DecompStore {
    // ========================================================================
    // Decomposition tags
    // ========================================================================

    /// `shape(c1,c2,...)` with intermediate components expanded in place.
    ///
    /// `拉:a(扌,立)` tags as `a(扌,立)`; `𫣂:a(亻,52)` with `52:d(51,皿)` and
    /// `51:w(乃,又)` tags as `a(亻,d(w(乃,又),皿))`.
    pub fn decomp_tag(&self, key: &str) -> String {
        self.tag_walk(key, false, &mut Walk::new())
    }

    /// [`Self::decomp_tag`] with every modifier suffix removed.
    pub fn clipped_decomp_tag(&self, key: &str) -> String {
        self.tag_walk(key, true, &mut Walk::new())
    }

    fn tag_walk<'a>(&'a self, key: &'a str, clipped: bool, walk: &mut Walk<'a>) -> String {
        let Some(record) = self.record(key) else {
            return key.to_string();
        };
        if !walk.enter(key) {
            return key.to_string();
        }
        let comps: Vec<String> = record
            .components
            .iter()
            .map(|comp| {
                if is_intermediate(comp) && self.contains(comp) {
                    self.tag_walk(comp, clipped, walk)
                } else {
                    comp.clone()
                }
            })
            .collect();
        walk.leave();
        let shape = if clipped {
            record.shape.base()
        } else {
            record.shape.as_str()
        };
        format!("{shape}({})", comps.join(","))
    }

    // ========================================================================
    // Owner tags
    // ========================================================================

    /// `[...]`: the non-intermediate owners of `key` concatenated, or when it
    /// has none, the owner tags of its owners.
    pub fn owner_tag(&self, key: &str) -> String {
        self.owner_tag_walk(key, &mut Walk::new())
    }

    fn owner_tag_walk<'a>(&'a self, key: &'a str, walk: &mut Walk<'a>) -> String {
        if !walk.enter(key) {
            return key.to_string();
        }
        let owners = self.owners(key);
        let direct: Vec<&str> = owners
            .iter()
            .map(String::as_str)
            .filter(|owner| !is_intermediate(owner))
            .collect();
        let body = if direct.is_empty() {
            owners
                .iter()
                .map(|owner| self.owner_tag_walk(owner, walk))
                .collect::<String>()
        } else {
            direct.concat()
        };
        walk.leave();
        format!("[{body}]")
    }

    // ========================================================================
    // Expansion
    // ========================================================================

    /// `key:shape(e1,e2,...)`, expanding every component that has components
    /// of its own, down to `depth` levels.
    pub fn expand(&self, key: &str, depth: usize) -> String {
        self.expand_walk(key, true, depth, &mut Walk::new())
    }

    /// [`Self::expand`] at [`EXPANSION_DEPTH`].
    pub fn full_expansion(&self, key: &str) -> String {
        self.expand(key, EXPANSION_DEPTH)
    }

    fn expand_walk<'a>(
        &'a self,
        key: &'a str,
        top: bool,
        depth: usize,
        walk: &mut Walk<'a>,
    ) -> String {
        let Some(record) = self.record(key) else {
            return key.to_string();
        };
        if (record.is_leaf() && !top) || depth == 0 || !walk.enter(key) {
            return key.to_string();
        }
        let comps: Vec<String> = record
            .components
            .iter()
            .map(|comp| self.expand_walk(comp, false, depth - 1, walk))
            .collect();
        walk.leave();
        format!("{key}:{}({})", record.shape, comps.join(","))
    }

    // ========================================================================
    // Flattening
    // ========================================================================

    /// Clipped shape followed by the flattened components.
    ///
    /// A component whose clipped shape equals the parent's, and which has
    /// components, contributes its own flattened components instead of
    /// itself, so `我:a(123,你)` with `123:a(他,比)` and `咱:a(他,456)` with
    /// `456:a(比,你)` both flatten to `a他比你`.
    pub fn flattened_signature(&self, key: &str) -> String {
        let Some(record) = self.record(key) else {
            return key.to_string();
        };
        let shape = record.shape.base();
        let mut walk = Walk::new();
        let mut out = shape.to_string();
        if walk.enter(key) {
            for comp in &record.components {
                self.flatten_walk(comp, shape, &mut walk, &mut out);
            }
        }
        out
    }

    fn flatten_walk<'a>(&'a self, comp: &'a str, shape: &str, walk: &mut Walk<'a>, out: &mut String) {
        if let Some(record) = self.record(comp) {
            if !record.is_leaf() && record.shape.base() == shape && walk.enter(comp) {
                for sub in &record.components {
                    self.flatten_walk(sub, shape, walk, out);
                }
                walk.leave();
                return;
            }
        }
        out.push_str(comp);
    }

    // ========================================================================
    // Bottom-up leveling
    // ========================================================================

    /// Level 0 is every leaf; level `n + 1` holds each owner of a level-`n`
    /// key whose components all sit in levels `0..=n`.
    pub fn bottom_up(&self, levels: usize) -> BottomUp {
        let core: Vec<String> = self
            .unique_keys()
            .into_iter()
            .filter(|key| self.components(key).is_empty())
            .map(str::to_string)
            .collect();

        let mut placed: AHashSet<String> = core.iter().cloned().collect();
        let mut previous = core.clone();
        let mut out = BottomUp {
            core,
            levels: Vec::with_capacity(levels),
        };

        for _ in 0..levels {
            let mut seen = AHashSet::new();
            let mut level = Vec::new();
            for key in &previous {
                for owner in self.owners(key) {
                    if seen.contains(owner) {
                        continue;
                    }
                    if self.components(owner).iter().all(|c| placed.contains(c)) {
                        seen.insert(owner.clone());
                        level.push(owner.clone());
                    }
                }
            }
            sort_keys(&mut level);
            placed.extend(level.iter().cloned());
            previous = level.clone();
            out.levels.push(level);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideograph_dsl::record::DecompRecord;

    fn store(lines: &str) -> DecompStore {
        DecompStore::from_text(lines, None).0
    }

    #[test]
    fn tag_of_simple_character() {
        let s = store("拉:a(扌,立)\n扌:c()\n立:c()\n");
        assert_eq!(s.decomp_tag("拉"), "a(扌,立)");
        assert_eq!(s.decomp_tag("扌"), "c()");
    }

    #[test]
    fn tag_expands_intermediates_only() {
        let s = store("𫣂:a(亻,52)\n52:d(51,皿)\n51:w/t(乃,又)\n亻:c()\n皿:c()\n乃:c()\n又:c()\n");
        assert_eq!(s.decomp_tag("𫣂"), "a(亻,d(w/t(乃,又),皿))");
        assert_eq!(s.clipped_decomp_tag("𫣂"), "a(亻,d(w(乃,又),皿))");
    }

    #[test]
    fn owner_tag_climbs_through_intermediates() {
        let s = store("𫣂:a(亻,52)\n咱:d(52,一)\n52:d(51,皿)\n51:w(乃,又)\n亻:c()\n皿:c()\n乃:c()\n又:c()\n一:c()\n");
        assert_eq!(s.owner_tag("52"), "[咱𫣂]");
        assert_eq!(s.owner_tag("51"), "[[咱𫣂]]");
        assert_eq!(s.owner_tag("皿"), "[[咱𫣂]]");
    }

    #[test]
    fn expansion_stops_at_leaves_and_depth() {
        let s = store("𫣂:a(亻,52)\n52:d(乃,皿)\n亻:c()\n皿:c()\n乃:c()\n");
        assert_eq!(s.full_expansion("𫣂"), "𫣂:a(亻,52:d(乃,皿))");
        assert_eq!(s.expand("𫣂", 1), "𫣂:a(亻,52)");
        assert_eq!(s.full_expansion("亻"), "亻:c()");
    }

    #[test]
    fn flattening_merges_same_shape_levels() {
        let s = store("我:a(123,你)\n123:a(他,比)\n咱:a(他,456)\n456:a/t(比,你)\n他:c()\n比:c()\n你:c()\n");
        assert_eq!(s.flattened_signature("我"), "a他比你");
        assert_eq!(s.flattened_signature("咱"), "a他比你");
        assert_eq!(s.flattened_signature("他"), "c");
    }

    #[test]
    fn cycles_are_rendered_literally() {
        let mut s = DecompStore::new();
        s.insert("1", DecompRecord::new("a", vec!["2".into(), "x".into()], ""));
        s.insert("2", DecompRecord::new("a", vec!["1".into(), "y".into()], ""));
        s.resolve();
        assert_eq!(s.decomp_tag("1"), "a(a(1,y),x)");
        assert_eq!(s.full_expansion("1"), "1:a(2:a(1,y),x)");
        assert_eq!(s.flattened_signature("1"), "a1yx");
        assert_eq!(s.owner_tag("1"), "[[1]]");
    }

    #[test]
    fn bottom_up_levels() {
        let s = store("一:c()\n丨:c()\n十:lock(一,丨)\n土:d(十,一)\n王:d(一,土)\n二:rd(一)\n");
        let bu = s.bottom_up(3);
        assert_eq!(bu.core, vec!["一", "丨"]);
        assert_eq!(bu.levels[0], vec!["二", "十"]);
        assert_eq!(bu.levels[1], vec!["土"]);
        assert_eq!(bu.levels[2], vec!["王"]);
    }
}
