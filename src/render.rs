// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Rendering of citation entries into BibTeX blocks and text references.
///
/// Both renderers are pure functions of the entry: rendering the same entry
/// twice yields identical output.
use crate::entry::CitationEntry;

/// Indentation applied to every BibTeX field line.
pub const BIBTEX_INDENT: &str = "    ";

/// Fields consulted, in order, for the venue of a text reference.
const VENUE_FIELDS: &[&str] = &["journal", "publisher", "organization", "institution"];

/// Renders the entry as a BibTeX block.
///
/// Required fields are written in schema order, followed by every optional
/// field that is present. Values are interpolated verbatim between double
/// quotes; embedded quotes are not escaped. The closing brace is not followed
/// by a newline.
///
/// # Examples
///
/// ```
/// use citeref::{ARTICLE, BuildOptions, CitationEntry, render_bibtex};
///
/// let raw: serde_yaml::Mapping = serde_yaml::from_str(
///     "{author: {given-names: T., family-names: Ester}, title: testing, journal: tested, year: 2000}",
/// )
/// .expect("valid YAML");
/// let entry = CitationEntry::build(&raw, "TESTING123", &ARTICLE, BuildOptions::default())
///     .expect("valid entry");
/// assert_eq!(
///     render_bibtex(&entry),
///     "@article{TESTING123,\n    author = \"T. Ester\",\n    title = \"testing\",\n    \
///      journal = \"tested\",\n    year = \"2000\",\n}"
/// );
/// ```
pub fn render_bibtex(entry: &CitationEntry) -> String {
    let mut output = format!("@{}{{{},\n", entry.entry_type(), entry.cite_key());

    for (field, value) in entry.fields() {
        if let Some(value) = value.as_deref() {
            output.push_str(&format!("{BIBTEX_INDENT}{field} = \"{value}\",\n"));
        }
    }

    output.push('}');
    output
}

/// Renders the entry as a single reference sentence.
///
/// The sentence reads `<author> (<year>). <title>.` followed, when present,
/// by the venue with article details, the version, and a DOI or URL link.
/// Blank values are skipped.
pub fn render_text(entry: &CitationEntry) -> String {
    let mut sentence = String::new();

    if let Some(author) = non_blank(entry, "author") {
        sentence.push_str(author);
    }
    if let Some(year) = non_blank(entry, "year") {
        push_word(&mut sentence, &format!("({year})"));
    }
    if !sentence.is_empty() {
        sentence.push('.');
    }

    if let Some(title) = non_blank(entry, "title") {
        push_word(&mut sentence, title);
        terminate(&mut sentence);
    }

    if let Some(venue) = VENUE_FIELDS.iter().find_map(|field| non_blank(entry, field)) {
        push_word(&mut sentence, venue);
        sentence.push_str(&issue_details(entry));
        terminate(&mut sentence);
    }

    if let Some(version) = non_blank(entry, "version") {
        push_word(&mut sentence, &format!("Version {version}."));
    }

    if let Some(doi) = non_blank(entry, "doi") {
        if doi.starts_with("http") {
            push_word(&mut sentence, doi);
        } else {
            push_word(&mut sentence, &format!("https://doi.org/{doi}"));
        }
    } else if let Some(url) = non_blank(entry, "url") {
        push_word(&mut sentence, url);
    }

    sentence
}

fn non_blank<'entry>(entry: &'entry CitationEntry, field: &str) -> Option<&'entry str> {
    entry.value(field).map(str::trim).filter(|value| !value.is_empty())
}

/// `, <volume>(<number>), <pages>` for whichever parts are present.
fn issue_details(entry: &CitationEntry) -> String {
    let mut details = String::new();
    match (non_blank(entry, "volume"), non_blank(entry, "number")) {
        (Some(volume), Some(number)) => details.push_str(&format!(", {volume}({number})")),
        (Some(volume), None) => details.push_str(&format!(", {volume}")),
        (None, Some(number)) => details.push_str(&format!(", ({number})")),
        (None, None) => {}
    }
    if let Some(pages) = non_blank(entry, "pages") {
        details.push_str(&format!(", {pages}"));
    }
    details
}

fn push_word(sentence: &mut String, word: &str) {
    if !sentence.is_empty() {
        sentence.push(' ');
    }
    sentence.push_str(word);
}

fn terminate(sentence: &mut String) {
    if !sentence.ends_with(['.', '?', '!']) {
        sentence.push('.');
    }
}

#[cfg(test)]
mod tests {
    use serde_yaml::Mapping;

    use super::{BIBTEX_INDENT, render_bibtex, render_text};
    use crate::{
        entry::{BuildOptions, CitationEntry},
        schema::{ARTICLE, MISC, SOFTWARE}
    };

    fn article(extra: &str) -> CitationEntry {
        let source = format!(
            "author:\n  - given-names: tester\n    family-names: testing\ntitle: testing\njournal: \
             tested\nyear: 2000\n{extra}"
        );
        let raw: Mapping = serde_yaml::from_str(&source).expect("valid YAML");
        CitationEntry::build(&raw, "TESTING123", &ARTICLE, BuildOptions::default())
            .expect("valid article")
    }

    #[test]
    fn bibtex_article_has_header_required_lines_and_closing_brace() {
        let entry = article("");
        let rendered = render_bibtex(&entry);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines[0], "@article{TESTING123,");
        assert_eq!(lines[lines.len() - 1], "}");
        assert_eq!(lines.len(), 2 + ARTICLE.required.len());
        assert_eq!(lines[1], format!("{BIBTEX_INDENT}author = \"tester testing\","));
        assert_eq!(lines[4], format!("{BIBTEX_INDENT}year = \"2000\","));
    }

    #[test]
    fn bibtex_includes_present_optionals_in_schema_order() {
        let entry = article(
            "doi: test\nvolume: test\nnumber: 42\npages: \"42\"\nmonth: test\nnote: test\nissn: \
             test\nzblnumber: test\neprint: test\nrandom_info: 42\n"
        );
        let rendered = render_bibtex(&entry);
        let lines: Vec<&str> = rendered.lines().collect();
        let body = &lines[1..lines.len() - 1];

        let expected: Vec<String> = ARTICLE
            .fields()
            .map(|field| {
                let value = entry.value(field).expect("all fields supplied");
                format!("{BIBTEX_INDENT}{field} = \"{value}\",")
            })
            .collect();
        assert_eq!(body, expected.as_slice());
        assert!(!rendered.contains("random_info"));
        assert!(body.contains(&"    number = \"42\","));
    }

    #[test]
    fn bibtex_keeps_blank_optionals_and_does_not_escape_quotes() {
        let entry = article("note: \"\"\ndoi: 'say \"hi\"'\n");
        let rendered = render_bibtex(&entry);
        assert!(rendered.contains("    note = \"\",\n"));
        assert!(rendered.contains("    doi = \"say \"hi\"\",\n"));
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn rendering_is_idempotent() {
        let entry = article("volume: 3\n");
        assert_eq!(render_bibtex(&entry), render_bibtex(&entry));
        assert_eq!(render_text(&entry), render_text(&entry));
    }

    #[test]
    fn text_article_sentence() {
        let entry = article("volume: 12\nnumber: 3\npages: 1-10\ndoi: 10.1000/xyz\n");
        assert_eq!(
            render_text(&entry),
            "tester testing (2000). testing. tested, 12(3), 1-10. https://doi.org/10.1000/xyz"
        );
    }

    #[test]
    fn text_software_sentence_uses_version_and_url() {
        let raw: Mapping = serde_yaml::from_str(
            r#"
author: {name: BrainGlobe Developers}
title: "brainglobe-meta: all BrainGlobe tools?"
url: https://github.com/brainglobe/brainglobe-meta
year: 2023
version: 1.0.0
"#
        )
        .expect("valid YAML");
        let entry = CitationEntry::build(&raw, "brainglobe-meta", &SOFTWARE, BuildOptions::default())
            .expect("valid software");

        assert_eq!(
            render_text(&entry),
            "BrainGlobe Developers (2023). brainglobe-meta: all BrainGlobe tools? Version 1.0.0. \
             https://github.com/brainglobe/brainglobe-meta"
        );
    }

    #[test]
    fn text_renders_untyped_metadata_through_misc_schema() {
        let raw: Mapping =
            serde_yaml::from_str("{author: {given-names: A., family-names: B}, title: T, year: 1}")
                .expect("valid YAML");
        let entry =
            CitationEntry::build(&raw, "key", &MISC, BuildOptions::default()).expect("valid misc");
        assert_eq!(render_text(&entry), "A. B (1). T.");
    }
}
