use super::*;

fn ordered_names(entries: &[(&str, Option<&str>, Option<&str>)]) -> Vec<String> {
	let mut orderer = Orderer::new("test");
	for (name, precedes, follows) in entries {
		orderer.add((*name).to_owned(), name, *precedes, *follows);
	}
	orderer.ordered()
}

#[test]
fn insertion_order_is_the_tie_break() {
	let names = ordered_names(&[("a", None, None), ("b", None, None), ("c", None, None)]);
	assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn named_constraints_reorder() {
	let names = ordered_names(&[
		("logging", None, Some("security")),
		("security", None, None),
		("caching", Some("logging"), None),
	]);
	assert_eq!(names, ["security", "caching", "logging"]);
}

#[test]
fn wildcard_precedes_everything() {
	let names = ordered_names(&[
		("a", None, None),
		("first", Some("*"), None),
		("b", None, None),
	]);
	assert_eq!(names, ["first", "a", "b"]);
}

#[test]
fn wildcard_follows_everything() {
	let names = ordered_names(&[
		("last", None, Some("*")),
		("a", None, None),
		("b", None, None),
	]);
	assert_eq!(names, ["a", "b", "last"]);
}

#[test]
fn comma_separated_lists() {
	let names = ordered_names(&[
		("c", None, None),
		("a", Some("b, c"), None),
		("b", None, None),
	]);
	assert_eq!(names[0], "a");
}

#[test]
fn cycles_degrade_instead_of_hanging() {
	let names = ordered_names(&[
		("a", Some("b"), None),
		("b", Some("a"), None),
		("c", None, None),
	]);
	// All items come out exactly once; the cycle resolves toward
	// insertion order.
	assert_eq!(names.len(), 3);
	assert!(names.contains(&"a".to_owned()));
	assert!(names.contains(&"b".to_owned()));
	assert_eq!(names[0], "c");
}

#[test]
fn unknown_references_are_ignored() {
	let names = ordered_names(&[("a", Some("nonexistent"), None), ("b", None, None)]);
	assert_eq!(names, ["a", "b"]);
}

#[test]
fn empty_and_single() {
	assert!(ordered_names(&[]).is_empty());
	assert_eq!(ordered_names(&[("only", Some("*"), None)]), ["only"]);
}
