use serde::Serialize;

use crate::dict::NameDict;
use crate::graph::FriendGraph;
use crate::search::ties_between;
use crate::{INDEX_MAX, MemberIndex};

/// What a query reports back to the caller.
///
/// `ok` says whether the question got a positive answer (including the
/// degenerate self query); `ties` is the number of intermediaries, with the
/// conventions pinned by the rest of the system: direct friends are 0 ties
/// apart, `INDEX_MAX` stands for "no path" and for the self query. The
/// `hint` is a human-oriented diagnostic and is only guaranteed non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub ok: bool,
    pub hint: String,
    pub ties: MemberIndex,
}

impl SearchOutcome {
    fn answered(hint: String, ties: MemberIndex) -> Self {
        SearchOutcome {
            ok: true,
            hint,
            ties,
        }
    }

    fn failed(hint: String) -> Self {
        SearchOutcome {
            ok: false,
            hint,
            ties: INDEX_MAX,
        }
    }
}

/// Answers "how many ties apart are `a` and `b`?".
///
/// Either argument may be a member name or a decimal index; indices are
/// tried first and must lie in `[0, N)` to count, anything else goes
/// through the dictionary. The fast paths (self query, direct friends)
/// never touch the engine; everything else runs the two-frontier search.
pub fn separation(a: &str, b: &str, dict: &NameDict, graph: &FriendGraph) -> SearchOutcome {
    if a == b {
        return SearchOutcome::answered(
            format!("{a} is their own friend already"),
            INDEX_MAX,
        );
    }

    let Some(index_a) = resolve(a, dict) else {
        return SearchOutcome::failed(format!("{a} is not a member of this social network"));
    };
    let Some(index_b) = resolve(b, dict) else {
        return SearchOutcome::failed(format!("{b} is not a member of this social network"));
    };

    if graph.is_empty() || graph.len() != dict.len() {
        return SearchOutcome::failed(format!(
            "network is empty or inconsistent: {} names against {} adjacency rows",
            dict.len(),
            graph.len()
        ));
    }

    let search_id = format!("{a}[{index_a}]<->{b}[{index_b}]");

    if index_a == index_b {
        // two spellings of the same member, e.g. an index and its name
        return SearchOutcome::answered(format!("{search_id} same member"), INDEX_MAX);
    }
    if graph.are_friends(index_a, index_b) {
        return SearchOutcome::answered(format!("{search_id} direct friends"), 0);
    }

    let (forward, backward) = ties_between(graph, index_a, index_b);
    let work = forward.stats.merge(&backward.stats);
    tracing::debug!(
        expanded = work.get_nodes_expanded(),
        marked = work.get_members_marked(),
        "two-frontier search finished"
    );
    let best = forward.ties.min(backward.ties);
    if best == INDEX_MAX {
        return SearchOutcome::failed(format!("{search_id} no chain of friends links them"));
    }

    let mut hint = format!("{search_id} {best} ties suffice");
    for (side, report) in [("forward", &forward), ("backward", &backward)] {
        if report.reached()
            && let Some(name) = dict.name_of(report.common)
        {
            hint.push_str(&format!(" {side}={name}[{}]<{}>", report.common, report.ties));
        }
    }
    SearchOutcome::answered(hint, best)
}

/// Decimal index in range, otherwise a dictionary name.
fn resolve(who: &str, dict: &NameDict) -> Option<MemberIndex> {
    if let Ok(index) = who.parse::<MemberIndex>()
        && (index as usize) < dict.len()
    {
        return Some(index);
    }
    dict.index_of(who)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Collection;

    fn network(text: &str) -> (NameDict, FriendGraph) {
        let mut collection = Collection::new();
        collection.process(text.as_bytes()).unwrap();
        let (dict, graph, _) = collection.compact().unwrap();
        (dict, graph)
    }

    /// A 13-member slice of the reference corpus, MYLES_JEFFCOAT and
    /// LANNY_TIBURCIO being direct friends within it.
    const CORPUS_SLICE: &str = "MYLES_JEFFCOAT,LANNY_TIBURCIO\n\
MYLES_JEFFCOAT,MARIANO_UMPHRESS\n\
MYLES_JEFFCOAT,ABEL_BONNES\n\
LANNY_TIBURCIO,SHAREN_FRETWELL\n\
MARIANO_UMPHRESS,LUCILA_FOLEY\n\
SHAREN_FRETWELL,DARLINE_FLYNN\n\
LUCILA_FOLEY,NICKY_MURR\n\
NICKY_MURR,CLIFTON_TIMMIS\n\
CLIFTON_TIMMIS,AARON_BOUSMAN\n\
AARON_BOUSMAN,KELLEY_SEMON\n\
KELLEY_SEMON,DION_FIGARO\n\
DION_FIGARO,TERINA_JEFFORDS\n";

    #[test]
    fn direct_friends_are_zero_ties_apart() {
        let (dict, graph) = network("John,Ian\n");
        let outcome = separation("John", "Ian", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, 0);
        assert!(outcome.hint.contains("direct friends"));
    }

    #[test]
    fn self_query_answers_with_the_sentinel() {
        let (dict, graph) = network("John,Ian\n");
        let outcome = separation("John", "John", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, INDEX_MAX);
        // even for names nobody has ever heard of
        let outcome = separation("Nobody", "Nobody", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, INDEX_MAX);
    }

    #[test]
    fn one_intermediary_between_chain_ends() {
        let (dict, graph) = network("A0,A1\nA1,A2\n");
        let outcome = separation("A0", "A2", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, 1);
        assert!(!outcome.hint.is_empty());
    }

    #[test]
    fn disjoint_chains_report_no_link() {
        let mut text = String::new();
        for at in 0..16 {
            text.push_str(&format!("A{},A{}\n", at, at + 1));
        }
        for at in 20..31 {
            text.push_str(&format!("A{at}x,A{}x\n", at + 1));
        }
        let (dict, graph) = network(&text);
        let outcome = separation("A1", "A30x", &dict, &graph);
        assert!(!outcome.ok);
        assert_eq!(outcome.ties, INDEX_MAX);
        assert!(outcome.hint.contains("no chain of friends"));
    }

    #[test]
    fn corpus_members_known_to_be_direct_friends() {
        let (dict, graph) = network(CORPUS_SLICE);
        let outcome = separation("MYLES_JEFFCOAT", "LANNY_TIBURCIO", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, 0);
    }

    #[test]
    fn search_is_symmetric_in_its_arguments() {
        let (dict, graph) = network(CORPUS_SLICE);
        for (a, b) in [
            ("MYLES_JEFFCOAT", "NICKY_MURR"),
            ("ABEL_BONNES", "TERINA_JEFFORDS"),
            ("SHAREN_FRETWELL", "LUCILA_FOLEY"),
        ] {
            let there = separation(a, b, &dict, &graph);
            let back = separation(b, a, &dict, &graph);
            assert_eq!(there.ok, back.ok);
            assert_eq!(there.ties, back.ties, "{a} vs {b}");
        }
    }

    #[test]
    fn members_resolve_by_decimal_index_too() {
        let (dict, graph) = network("John,Ian\nIan,Pete\n");
        // John is 0, Pete is 2
        let outcome = separation("0", "2", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, 1);
        // mixing an index with a name is fine
        let outcome = separation("John", "2", &dict, &graph);
        assert_eq!(outcome.ties, 1);
        // an index and the name of the same member is a self query
        let outcome = separation("0", "John", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, INDEX_MAX);
    }

    #[test]
    fn out_of_range_indices_fall_back_to_name_lookup() {
        let (dict, graph) = network("John,Ian\n");
        let outcome = separation("7", "John", &dict, &graph);
        assert!(!outcome.ok);
        assert_eq!(outcome.ties, INDEX_MAX);
        assert!(outcome.hint.contains("7"));
    }

    #[test]
    fn unknown_members_are_reported_by_name() {
        let (dict, graph) = network("John,Ian\n");
        let outcome = separation("John", "Elvis", &dict, &graph);
        assert!(!outcome.ok);
        assert!(outcome.hint.contains("Elvis"));
        assert_eq!(outcome.ties, INDEX_MAX);
    }

    #[test]
    fn inconsistent_structures_are_refused() {
        let (dict, _) = network("John,Ian\n");
        let empty = FriendGraph::new();
        let outcome = separation("John", "Ian", &dict, &empty);
        assert!(!outcome.ok);
        assert!(outcome.hint.contains("empty or inconsistent"));

        let lopsided = FriendGraph::from_lists(vec![vec![]]);
        let outcome = separation("John", "Ian", &dict, &lopsided);
        assert!(!outcome.ok);
    }

    #[test]
    fn linked_outcome_hint_names_the_meeting_evidence() {
        let (dict, graph) = network("A0,A1\nA1,A2\nA2,A3\nA3,A4\n");
        let outcome = separation("A0", "A4", &dict, &graph);
        assert!(outcome.ok);
        assert_eq!(outcome.ties, 3);
        assert!(outcome.hint.contains("A0[0]<->A4[4]"));
        assert!(outcome.hint.contains("3 ties suffice"));
    }

    #[test]
    fn outcome_serializes_for_the_json_report() {
        let (dict, graph) = network("John,Ian\n");
        let json = serde_json::to_string(&separation("John", "Ian", &dict, &graph)).unwrap();
        assert!(json.contains("\"ok\":true"));
        assert!(json.contains("\"ties\":0"));
    }
}
