//! Report catalogue and formatters.
//!
//! Every formatter is a pure function from already-built structures to the
//! report text. Writing files (and the byte-order mark) is the sink's job.

use clap::ValueEnum;
use ideograph_dsl::blocks::{UnicodeBlock, REPORT_ORDER};
use ideograph_dsl::key::is_intermediate;
use ideograph_dsl::shape::{is_known_shape, SHAPE_SUMMARY_ROWS};
use ideograph_store::{ComparisonBuckets, DecompStore, Group, MergeSuggestion, RadicalBucket, EXPANSION_DEPTH};
use ideograph_unihan::{Frequencies, IrgSources, Priority, SyllableTable, VariantGraph};

/// Items per line before a summary line wraps.
const WRAP_AFTER: usize = 50;

/// Radical owners listed per line.
const RADICAL_OWNERS: usize = 12;

const BOTTOM_UP_LEVELS: usize = 3;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportKind {
    NewCharData,
    ModelData,
    CharsWithOwners,
    IntermCharsWithOwners,
    Expanded,
    DecompTags,
    DecompTagSummary,
    ShapeData,
    ShapeSummary,
    LeaderData,
    LeaderSummary,
    FlattenSummary,
    FormData,
    BottomUp,
    Radicals,
    Sequence,
    PossibleBases,
    Samples,
    Longs,
    Shorts,
    IdsMerges,
    Variants,
    Iicore,
    Syllables,
}

impl ReportKind {
    pub const ALL: [ReportKind; 24] = [
        ReportKind::NewCharData,
        ReportKind::ModelData,
        ReportKind::CharsWithOwners,
        ReportKind::IntermCharsWithOwners,
        ReportKind::Expanded,
        ReportKind::DecompTags,
        ReportKind::DecompTagSummary,
        ReportKind::ShapeData,
        ReportKind::ShapeSummary,
        ReportKind::LeaderData,
        ReportKind::LeaderSummary,
        ReportKind::FlattenSummary,
        ReportKind::FormData,
        ReportKind::BottomUp,
        ReportKind::Radicals,
        ReportKind::Sequence,
        ReportKind::PossibleBases,
        ReportKind::Samples,
        ReportKind::Longs,
        ReportKind::Shorts,
        ReportKind::IdsMerges,
        ReportKind::Variants,
        ReportKind::Iicore,
        ReportKind::Syllables,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::NewCharData => "new-char-data",
            ReportKind::ModelData => "model-data",
            ReportKind::CharsWithOwners => "chars-with-owners",
            ReportKind::IntermCharsWithOwners => "interm-chars-with-owners",
            ReportKind::Expanded => "expanded",
            ReportKind::DecompTags => "decomp-tags",
            ReportKind::DecompTagSummary => "decomp-tag-summary",
            ReportKind::ShapeData => "shape-data",
            ReportKind::ShapeSummary => "shape-summary",
            ReportKind::LeaderData => "leader-data",
            ReportKind::LeaderSummary => "leader-summary",
            ReportKind::FlattenSummary => "flatten-summary",
            ReportKind::FormData => "form-data",
            ReportKind::BottomUp => "bottom-up",
            ReportKind::Radicals => "radicals",
            ReportKind::Sequence => "sequence",
            ReportKind::PossibleBases => "possible-bases",
            ReportKind::Samples => "samples",
            ReportKind::Longs => "longs",
            ReportKind::Shorts => "shorts",
            ReportKind::IdsMerges => "ids-merges",
            ReportKind::Variants => "variants",
            ReportKind::Iicore => "iicore",
            ReportKind::Syllables => "syllables",
        }
    }

    /// Output file name inside the output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::NewCharData => "newCharData.txt",
            ReportKind::ModelData => "modelData.txt",
            ReportKind::CharsWithOwners => "charsWithOwners.txt",
            ReportKind::IntermCharsWithOwners => "intermCharsWithOwners.txt",
            ReportKind::Expanded => "charDataExpanded.txt",
            ReportKind::DecompTags => "charDataDecompTags.txt",
            ReportKind::DecompTagSummary => "charDecompTagSummary.txt",
            ReportKind::ShapeData => "shapeData.txt",
            ReportKind::ShapeSummary => "shapeDataSummary.txt",
            ReportKind::LeaderData => "leaderData.txt",
            ReportKind::LeaderSummary => "leaderDataSummary.txt",
            ReportKind::FlattenSummary => "flattenDataSummary.txt",
            ReportKind::FormData => "formData.txt",
            ReportKind::BottomUp => "bottomUpView.txt",
            ReportKind::Radicals => "radicals.txt",
            ReportKind::Sequence => "sequencedData.txt",
            ReportKind::PossibleBases => "possibleBases.txt",
            ReportKind::Samples => "charSamples.txt",
            ReportKind::Longs => "longs.txt",
            ReportKind::Shorts => "shorts.txt",
            ReportKind::IdsMerges => "idsMerges.txt",
            ReportKind::Variants => "variantsList.txt",
            ReportKind::Iicore => "iiCoreData.txt",
            ReportKind::Syllables => "syllableList.txt",
        }
    }

    /// Whether the file may carry a byte-order mark. The rewritten data must
    /// stay loadable as input, and the Unihan lists never had one.
    pub fn takes_bom(self) -> bool {
        !matches!(
            self,
            ReportKind::NewCharData | ReportKind::Variants | ReportKind::Iicore | ReportKind::Syllables
        )
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn rule(c: char, n: usize) -> String {
    let mut line: String = std::iter::repeat(c).take(n).collect();
    line.push('\n');
    line
}

/// Owner tag for intermediates, nothing for real characters.
fn interm_tag(store: &DecompStore, key: &str) -> String {
    if is_intermediate(key) {
        store.owner_tag(key)
    } else {
        String::new()
    }
}

/// `item,` per item, breaking onto a `...` line once more than
/// [`WRAP_AFTER`] items are on the current one.
fn push_wrapped<I, S>(out: &mut String, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut count = 0;
    for item in items {
        if count > WRAP_AFTER {
            out.push_str("\n...");
            count = 0;
        }
        out.push_str(item.as_ref());
        out.push(',');
        count += 1;
    }
    out.push('\n');
}

/// Merge suggestion plus one comment line per member.
fn push_merge_block(out: &mut String, store: &DecompStore, members: &[String]) {
    out.push_str(&format!("\tmerge {}\n", members.join(" ")));
    for member in members {
        out.push_str(&format!(
            "\t//{member}: {}; {}\n",
            store.decomp_tag(member),
            store.owner_tag(member)
        ));
    }
}

fn record_line(store: &DecompStore, key: &str) -> String {
    let (shape, comps) = store
        .lookup(key)
        .map(|(shape, comps)| (shape.as_str(), comps.join(",")))
        .unwrap_or_default();
    format!("{key}:{shape}({comps});owners:({})\n", store.owners(key).join(","))
}

// ============================================================================
// Store reports
// ============================================================================

pub fn new_char_data(store: &DecompStore) -> String {
    store.serialize()
}

/// `key:record //ownertag` per enumeration entry.
pub fn model_data(store: &DecompStore) -> String {
    let mut out = String::new();
    for key in store.keys() {
        if let Some(record) = store.record(key) {
            out.push_str(&format!("{key}:{record} //{}\n", store.owner_tag(key)));
        }
    }
    out
}

pub fn chars_with_owners(store: &DecompStore) -> String {
    store.keys().map(|key| record_line(store, key)).collect()
}

pub fn interm_chars_with_owners(store: &DecompStore) -> String {
    store
        .intermediates_by_owners()
        .into_iter()
        .map(|key| record_line(store, key))
        .collect()
}

pub fn expanded(store: &DecompStore) -> String {
    store
        .keys()
        .map(|key| format!("{}\n", store.expand(key, EXPANSION_DEPTH)))
        .collect()
}

pub fn decomp_tags(store: &DecompStore) -> String {
    store
        .keys()
        .map(|key| format!("{key}:{}{}\n", store.decomp_tag(key), interm_tag(store, key)))
        .collect()
}

pub fn decomp_tag_summary(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.tag_groups() {
        out.push_str(&format!("{}:{}\n", group.key, group.members.join(",")));
        if group.len() > 1 {
            push_merge_block(&mut out, store, &group.members);
        }
    }
    out
}

pub fn shape_data(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.shape_groups() {
        out.push_str(&format!("{}:\n", group.key));
        for member in &group.members {
            out.push_str(&format!("\t{member}: [{}]\n", store.components(member).join(" ")));
        }
    }
    out
}

fn intermediate_count(group: &Group) -> usize {
    group.members.iter().filter(|m| is_intermediate(m)).count()
}

/// Vocabulary rows with counts, then every shape group with its members.
pub fn shape_summary(store: &DecompStore) -> String {
    let groups = store.shape_groups();
    for group in &groups {
        if !is_known_shape(&group.key) {
            tracing::warn!(shape = %group.key, "shape missing from the summary vocabulary");
        }
    }

    let mut out = String::new();
    for row in SHAPE_SUMMARY_ROWS {
        for shape in *row {
            let Some(group) = groups.iter().find(|g| g.key == *shape) else {
                tracing::debug!(shape = %shape, "no keys use shape");
                continue;
            };
            let interm = intermediate_count(group);
            out.push_str(&format!(
                "{shape}({},{interm},{}%), ",
                group.len(),
                100 * interm / group.len()
            ));
        }
        out.push('\n');
    }

    out.push_str(&rule('=', 40));
    for group in &groups {
        out.push_str(&format!(
            "{} ({}, {}): ",
            group.key,
            group.len(),
            intermediate_count(group)
        ));
        push_wrapped(
            &mut out,
            group.members.iter().map(|m| {
                if is_intermediate(m) {
                    format!("{m}:{}", store.owner_tag(m))
                } else {
                    m.clone()
                }
            }),
        );
    }
    out
}

pub fn leader_data(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.leader_groups() {
        out.push_str(&format!("{}:\n", group.key));
        for member in &group.members {
            let shape = store.record(member).map(|r| r.shape.as_str()).unwrap_or("");
            out.push_str(&format!(
                "\t{member}: {shape} [{}]\n",
                store.components(member).join(" ")
            ));
        }
    }
    out
}

pub fn leader_summary(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.leader_groups() {
        out.push_str(&format!("{} ({}): ", group.key, group.len()));
        push_wrapped(&mut out, &group.members);
    }
    out
}

/// Signature groups with more than one member. Each member shows its
/// top-level components, and intermediates their owner tag.
pub fn flatten_summary(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.flatten_groups().into_iter().filter(|g| g.len() > 1) {
        out.push_str(&format!("{} ({}): ", group.key, group.len()));
        push_wrapped(
            &mut out,
            group.members.iter().map(|m| {
                format!("{m}{}({})", interm_tag(store, m), store.components(m).concat())
            }),
        );
    }
    out
}

pub fn form_data(store: &DecompStore) -> String {
    let mut out = String::new();
    for group in store.form_groups().into_iter().filter(|g| g.len() > 1) {
        push_merge_block(&mut out, store, &group.members);
    }
    out
}

pub fn bottom_up(store: &DecompStore) -> String {
    let view = store.bottom_up(BOTTOM_UP_LEVELS);
    let mut out = rule('=', 40);
    out.push_str(">>> core:\n");
    for key in &view.core {
        out.push_str(&format!("{key}:{}\n", store.decomp_tag(key)));
    }
    for (i, level) in view.levels.iter().enumerate() {
        out.push_str(&rule('=', 40));
        out.push_str(&format!(">>> level {}:\n", i + 1));
        for key in level {
            out.push_str(&format!("{key}:{}{}\n", store.decomp_tag(key), interm_tag(store, key)));
        }
    }
    out.push_str(&rule('=', 40));
    out
}

pub fn radicals(store: &DecompStore) -> String {
    let buckets = store.radical_buckets();
    let mut out = rule('=', 60);
    for bucket in RadicalBucket::ALL {
        out.push_str(bucket.header());
        out.push('\n');
        out.push_str(&rule('-', 40));
        for (key, _) in buckets.iter().filter(|(_, b)| *b == bucket) {
            let owners = store.owners(key);
            let shown = &owners[..owners.len().min(RADICAL_OWNERS)];
            out.push_str(&format!(
                "{};owners:({})\n",
                store.expand(key, EXPANSION_DEPTH),
                shown.join(",")
            ));
        }
        out.push_str(&rule('=', 60));
    }
    out
}

pub fn sequence(store: &DecompStore) -> String {
    let tallies = store.block_tallies();
    for key in &tallies.unclassified {
        tracing::warn!(key = %key, "key outside every known block");
    }
    let mut out = String::new();
    for block in REPORT_ORDER {
        out.push_str(&format!("{}: {}\n", block, tallies.keys_in(block)));
    }
    out.push('\n');
    for block in REPORT_ORDER {
        for comp_block in REPORT_ORDER {
            let n = tallies.pair(block, comp_block);
            if n != 0 {
                out.push_str(&format!("{block}, {comp_block}: {n}\n"));
            }
        }
    }
    out.push('\n');
    out
}

/// Core shapes listed on the first section of the possible-bases report.
const CORE_SHAPES: [(&str, &str); 3] = [("stroke", "c"), ("katakana", "ck"), ("zhuyin", "cz")];

/// Curated candidate base components, by section.
pub const POSSIBLE_BASES: &[(&str, &[&str])] = &[
    ("modified", &["⺄", "乁", "厂", "㇘", "59210", "59668", "99980", "63688"]),
    (
        "overlapping",
        &["七", "𠤎", "九", "十", "乂", "乄", "又", "力", "廴", "𠀁", "乜", "10013", "60954"],
    ),
    ("repeatingHeng", &["99932", "二", "𠄟", "𠄠", "三", "99876", "亖", "65808"]),
    ("repeatingNa", &["⺀", "99951", "𠁼", "57433", "37546", "99797", "灬"]),
    ("repeatingShu", &["10001", "37372", "川", "57929"]),
    ("repeatingPie", &["37125", "彡"]),
    (
        "repeatingOther",
        &["巜", "巛", "99836", "𠃏", "99798", "37843", "69992", "37397", "26128", "𠃐"],
    ),
    (
        "touching",
        &[
            "匕", "⺁", "⺆", "⺊", "⻖", "㔾", "丁", "丂", "丄", "丅", "丆", "丩", "乃", "了", "亠",
            "亻", "人", "几", "刀", "勹", "匚", "卜", "卩", "厶", "阝", "𠁡", "𠁢", "𠂉", "𠃉", "𠄐",
            "𠚣", "𠤬", "𢎘", "37650", "37143", "37184", "37712", "49005", "62449", "99747",
            "37681", "37431", "37820", "49306", "53055", "55643", "61646", "62101", "99894",
            "99774", "99783", "99856", "56565", "51840", "99731",
        ],
    ),
    (
        "disjoint",
        &[
            "八", "儿", "冫", "刁", "刂", "讠", "𠀂", "𠄍", "𪜊", "37473", "37698", "38288", "辶",
            "48378", "48997", "99907", "10018", "59243", "59409", "60665", "64037", "99702",
            "37476", "32292", "37255", "62211", "99773", "99824", "99847",
        ],
    ),
    (
        "secondLevel",
        &[
            "㐅", "纟", "⺈", "⺋", "⺐", "⺙", "⺢", "⺦", "⺭", "⺼", "⺿", "⻎", "⻠", "㐄", "㔫",
            "㔿", "万", "丈", "上", "下", "丌", "不", "丑", "丬", "丯", "丷", "丸", "丹", "为",
            "久", "乆", "乇", "么", "义", "乞", "也", "习", "乡", "亍", "亏", "亐", "云", "亓",
            "井", "以", "兀", "入", "六", "冃", "冄", "内", "円", "冖", "凡", "凢", "凵", "凸",
            "刃", "刄", "勿", "匀", "匚", "匸", "千", "卄", "卅", "卌", "卍", "卝", "卬", "卯",
            "及", "囗", "土", "士", "夂", "大", "夫", "女", "子", "孒", "孓", "小", "州", "工",
            "巾", "干", "幺", "广", "彐", "彑", "彳", "心", "忄", "扌", "支", "攴", "文", "斗",
            "斤", "方", "月", "木", "止", "氏", "氵", "父", "犭", "癶", "禸", "见", "贝", "车",
            "门", "马", "龴", "𠀃", "𠀄", "𠀅", "𠀊", "𠁽", "𠂇", "𠂈", "𠂊", "𠂋", "𠂍", "𠂎",
            "𠂏", "𠂐", "𠂓", "𠂖", "𠃒", "𠃓", "𠃘", "𠄏", "𠄑", "𠄡", "𠆢", "𠆥", "𠑶", "𠔀",
            "𠔂", "𠔇", "𠔽", "𠕄", "𠘧", "𠘨", "𠙴", "𠚣", "𠠲", "𠣌", "𠥓", "𠥻", "𠥼", "𠦂",
            "𠧒", "𠫓", "𠫔", "𠬝", "𡕒", "𡤼", "𡭔", "𡭖", "𡯁", "𡯃", "𡿧", "𢌬", "𢍺", "𢖩",
            "𣂑", "𣎳", "𣦶", "𤓯", "𤣥", "𥘅", "𦉪", "𦉫", "𪜀", "𪜁", "𪟽", "𫝀", "𫝄", "𫞕",
            "𫡏", "𫶧", "𬂛",
        ],
    ),
];

pub fn possible_bases(store: &DecompStore) -> String {
    let mut out = rule('=', 40);
    out.push_str(">>> coreComponents:\n");
    for (name, shape) in CORE_SHAPES {
        out.push_str(&format!("{name}: {}\n", store.keys_with_shape(shape).concat()));
    }
    for (section, bases) in POSSIBLE_BASES {
        out.push_str(&rule('=', 40));
        out.push_str(&format!(">>> {section}:\n"));
        for base in *bases {
            out.push_str(&format!("{base}:{}{}\n", store.decomp_tag(base), interm_tag(store, base)));
        }
    }
    out.push_str(&rule('=', 40));
    out
}

/// Every scalar of each real block; a line holds 51 scalars.
pub fn samples() -> String {
    let mut out = String::new();
    for block in REPORT_ORDER {
        if block == UnicodeBlock::Intermediate {
            continue;
        }
        out.push_str(&format!("{block}\n"));
        out.push_str(&rule('-', 100));
        let mut on_line = 0;
        for c in block.scalars() {
            out.push(c);
            on_line += 1;
            if on_line > WRAP_AFTER {
                out.push('\n');
                on_line = 0;
            }
        }
        out.push('\n');
        out.push_str(&rule('=', 100));
    }
    out
}

// ============================================================================
// IDS cross-checks
// ============================================================================

pub fn comparisons(buckets: &ComparisonBuckets) -> String {
    buckets
        .iter()
        .flat_map(|(_, items)| items.iter().map(|item| format!("{item}\n")))
        .collect()
}

pub fn ids_merges(suggestions: &[MergeSuggestion]) -> String {
    suggestions.iter().map(|s| format!("{s}\n")).collect()
}

// ============================================================================
// Unihan reports
// ============================================================================

pub fn variants(graph: &VariantGraph) -> String {
    let mut out = String::new();
    for group in graph.groups().into_iter().filter(|g| !g.links.is_empty()) {
        let members: String = group
            .chars
            .iter()
            .map(|c| format!("{c}({:x})", u32::from(*c)))
            .collect();
        out.push_str(&format!("{members}: {}... ", group.pair_count()));
        for link in group.forward_links() {
            out.push_str(&format!(
                "{}/{}: true, {}, {}; ",
                link.from, link.to, link.field, link.tag
            ));
        }
        out.push('\n');
    }
    out
}

pub fn iicore(irg: &IrgSources) -> String {
    let mut out = String::new();
    for priority in Priority::ALL {
        out.push_str(&format!("Priority {priority}\n"));
        for core in irg.by_priority(priority) {
            out.push_str(&format!("{}: {}\n", core.ch, core.sources));
        }
        out.push_str("==========\n");
    }
    out
}

/// `syllable: chars/others [initial,final,tone]`, main readings ordered by
/// frequency rank.
pub fn syllables(table: &SyllableTable, freq: &Frequencies) -> String {
    let mut out = String::new();
    for entry in table.entries() {
        let mut chars = entry.chars.clone();
        freq.order(&mut chars);
        let chars: String = chars.into_iter().collect();
        let others: String = entry.others.iter().collect();
        out.push_str(&format!("{}: {chars}/{others} [{}]\n", entry.syllable, entry.parts));
    }
    out
}
