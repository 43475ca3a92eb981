mod common;

use std::path::Path;
use std::time::Duration;

use common::{FakeFetcher, png};
use horadric_catalog::{CatalogItem, ItemKind};
use horadric_db::*;
use horadric_import::*;
use horadric_media::MemoryBlobStore;
use rusqlite::Connection;

const MISC: &str = "name\tcode\ttype\tlevelreq\n\
El Rune\tr01\trune\t11\n\
Eld Rune\tr02\trune\t11\n\
Chipped Ruby\tgcr\tgemr\t1\n\
Horadric Cube\tbox\tques\t\n";

const WEAPONS: &str = "name\tcode\ttype\tlevelreq\n\
Short Sword\tssd\tswor\t\n\
Expansion\n\
El Rune\tr01x\tmisc\t\n";

const UNIQUES: &str = "index\tcode\tlvl req\tprop1\tpar1\tmin1\tmax1\tprop2\tpar2\tmin2\tmax2\n\
Stone crusher\tmau\t68\tdmg%\t\t280\t320\toddstat\t\t5\t5\n\
Shako\tuap\tabc\tallskills\t\t2\t2\t\t\t\t\n";

const RUNES: &str = "Name\t*Rune Name\tcomplete\titype1\tRune1\tRune2\tT1Code1\tT1Param1\tT1Min1\tT1Max1\n\
Runeword1\tSteel\t1\tswor\tr01\tr02\tswing2\t\t25\t25\n";

const HTML: &str = r#"<html><body>
<div class="item" data-kind="unique">
  <span class="item-name">Stone Crusher</span>
  <img src="img/stone.png">
  <ul class="item-props"><li>+150 To Attack Rating</li></ul>
</div>
<div class="item" data-kind="rune">
  <span class="item-name">El Rune</span>
  <img src="img/el.png">
</div>
<div class="item" data-kind="rune">
  <span class="item-name">Eld Rune</span>
  <img src="img/eld.png">
</div>
</body></html>"#;

fn write_fixtures(dir: &Path) {
    let tables = dir.join("tables");
    std::fs::create_dir_all(&tables).unwrap();
    std::fs::write(tables.join("Misc.txt"), MISC).unwrap();
    std::fs::write(tables.join("Weapons.txt"), WEAPONS).unwrap();
    std::fs::write(tables.join("UniqueItems.txt"), UNIQUES).unwrap();
    std::fs::write(tables.join("Runes.txt"), RUNES).unwrap();
    std::fs::write(dir.join("page.html"), HTML).unwrap();
}

fn options(dir: &Path) -> ImportOptions {
    ImportOptions {
        tables_dir: Some(dir.join("tables")),
        html_files: vec![dir.join("page.html")],
        html_kind: ItemKind::Unique,
        image_base_url: Some("https://site.example/".to_string()),
        ..Default::default()
    }
}

fn fetcher() -> FakeFetcher {
    FakeFetcher::default()
        .with("https://site.example/img/stone.png", png(6, [90, 90, 90, 255]))
        .with("https://site.example/img/el.png", png(6, [200, 200, 0, 255]))
        .with("https://site.example/img/eld.png", png(6, [0, 200, 200, 255]))
}

fn table_counts(conn: &Connection) -> Vec<i64> {
    ItemKind::ALL
        .iter()
        .map(|k| count_items(conn, *k).unwrap())
        .collect()
}

#[test]
fn full_import_reconciles_sources() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let report = run_import(&conn, &blobs, &fetcher(), &options(tmp.path()), &SilentProgress).unwrap();
    assert!(!report.timed_out);

    // The HTML "Stone Crusher" name-syncs the table row instead of adding one.
    let uniques = list_items(&conn, ItemKind::Unique).unwrap();
    assert_eq!(uniques.len(), 1);
    assert_eq!(uniques[0].name, "Stone Crusher");
    assert_eq!(report.stats_for(ItemKind::Unique).imported, 1);
    assert_eq!(report.stats_for(ItemKind::Unique).renamed, 1);

    // Table properties were attached; HTML ones were not added on top.
    let props = properties_for_item(&conn, ItemKind::Unique, uniques[0].id).unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].assignment.code, "dmg%");
    assert_eq!((props[0].assignment.min, props[0].assignment.max), (280, 320));
    assert!(props[1].assignment.is_raw());
    assert_eq!(report.missing_stat_codes, vec!["oddstat 5-5".to_string()]);

    // "abc" is not a number, so the Shako row was dropped with a parse issue.
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.kind == IssueKind::Parse && e.subject.contains("UniqueItems.txt"))
    );

    // The Misc rows split across kinds; the Weapons "El Rune" shadow is gone.
    assert_eq!(count_items(&conn, ItemKind::Rune).unwrap(), 2);
    assert_eq!(count_items(&conn, ItemKind::Gem).unwrap(), 1);
    assert_eq!(count_items(&conn, ItemKind::Quest).unwrap(), 1);
    let bases: Vec<String> = list_items(&conn, ItemKind::Base)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(bases, vec!["Short Sword"]);
    assert_eq!(report.dedupe.cross_domain_found, 1);

    // Rune icons were stored, so the runeword got a composite.
    assert_eq!(report.images.uploaded, 3);
    assert_eq!(report.composites.created, 1);
    let steel = &list_items(&conn, ItemKind::Runeword).unwrap()[0];
    assert_eq!(steel.runes, vec!["r01", "r02"]);
    assert!(steel.has_image());
    assert_eq!(blobs.len(), 4);

    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(Some(logs[0].id), report.log_id);
    assert_eq!(logs[0].records_updated, 1);
}

#[test]
fn second_run_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();
    let fetcher = fetcher();

    run_import(&conn, &blobs, &fetcher, &options(tmp.path()), &SilentProgress).unwrap();
    let counts = table_counts(&conn);
    let writes = blobs.writes();

    // Import only the HTML page again: every name now matches exactly.
    let html_only = ImportOptions {
        tables_dir: None,
        ..options(tmp.path())
    };
    let report = run_import(&conn, &blobs, &fetcher, &html_only, &SilentProgress).unwrap();
    assert_eq!(report.total_imported(), 0);
    assert_eq!(report.total_renamed(), 0);
    assert_eq!(report.images.already_set, 3);
    assert_eq!(report.composites.kept, 1);
    assert_eq!(table_counts(&conn), counts);
    assert_eq!(blobs.writes(), writes);
}

#[test]
fn dry_run_leaves_everything_untouched() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    insert_item(&conn, &CatalogItem::new(ItemKind::Unique, "Stone crusher")).unwrap();
    let blobs = MemoryBlobStore::default();
    let fetcher = fetcher();

    let opts = ImportOptions {
        dry_run: true,
        ..options(tmp.path())
    };
    let report = run_import(&conn, &blobs, &fetcher, &opts, &SilentProgress).unwrap();

    assert!(report.dry_run);
    assert!(report.total_imported() > 0);
    assert_eq!(report.images.planned, 3);
    assert!(report.log_id.is_none());

    assert_eq!(table_counts(&conn), vec![0, 0, 0, 0, 1, 0, 0]);
    let row = &list_items(&conn, ItemKind::Unique).unwrap()[0];
    assert_eq!(row.name, "Stone crusher");
    assert_eq!(catalog_stats(&conn).unwrap().stat_codes, 0);
    assert!(list_import_logs(&conn, None).unwrap().is_empty());
    assert_eq!(fetcher.fetches(), 0);
    assert!(blobs.is_empty());
}

#[test]
fn expired_deadline_stops_before_any_item() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let opts = ImportOptions {
        timeout: Some(Duration::ZERO),
        ..options(tmp.path())
    };
    let report = run_import(&conn, &blobs, &fetcher(), &opts, &SilentProgress).unwrap();

    assert!(report.timed_out);
    assert_eq!(report.total_imported(), 0);
    assert_eq!(
        report
            .errors
            .iter()
            .filter(|e| e.kind == IssueKind::Deadline)
            .count(),
        1
    );
    assert_eq!(table_counts(&conn).iter().sum::<i64>(), 0);
    assert!(blobs.is_empty());
}

#[test]
fn unreadable_html_page_is_reported_not_fatal() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let opts = ImportOptions {
        html_files: vec![tmp.path().join("missing.html"), tmp.path().join("page.html")],
        ..options(tmp.path())
    };
    let report = run_import(&conn, &blobs, &fetcher(), &opts, &SilentProgress).unwrap();
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.kind == IssueKind::Parse && e.subject.ends_with("missing.html"))
    );
    assert_eq!(report.stats_for(ItemKind::Unique).renamed, 1);
}

#[test]
fn class_yaml_seeds_skill_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    let classes = tmp.path().join("classes");
    std::fs::create_dir_all(&classes).unwrap();
    std::fs::write(
        classes.join("barbarian.yaml"),
        "id: barbarian\nname: Barbarian\nshort_name: bar\ntrees:\n  - name: Combat Skills\n    skills:\n      - id: whirlwind\n        name: Whirlwind\n        required_level: 30\n",
    )
    .unwrap();
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let opts = ImportOptions {
        classes_dir: Some(classes),
        ..Default::default()
    };
    let report = run_import(&conn, &blobs, &FakeFetcher::default(), &opts, &SilentProgress).unwrap();
    let registry = StatRegistry::load(&conn).unwrap();
    assert_eq!(report.stats_seeded, registry.count());
    assert_eq!(registry.resolve("Whirlwind").unwrap().code, "skill:whirlwind");
}

#[test]
fn repeated_full_import_renames_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();
    let fetcher = fetcher();

    let first = run_import(&conn, &blobs, &fetcher, &options(tmp.path()), &SilentProgress).unwrap();
    assert_eq!(first.total_renamed(), 1);

    // The table still says "Stone crusher", but only the page spelling is synced.
    let second = run_import(&conn, &blobs, &fetcher, &options(tmp.path()), &SilentProgress).unwrap();
    assert_eq!(second.total_renamed(), 0);
    assert_eq!(second.stats_for(ItemKind::Unique).imported, 0);
    let uniques = list_items(&conn, ItemKind::Unique).unwrap();
    assert_eq!(uniques.len(), 1);
    assert_eq!(uniques[0].name, "Stone Crusher");
}

#[test]
fn malformed_table_file_is_skipped() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_fixtures(tmp.path());
    std::fs::write(tmp.path().join("tables/Misc.txt"), "name\tcode\nEl Rune\tr01\n").unwrap();
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let opts = ImportOptions {
        html_files: Vec::new(),
        ..options(tmp.path())
    };
    let report = run_import(&conn, &blobs, &fetcher(), &opts, &SilentProgress).unwrap();

    assert!(
        report
            .errors
            .iter()
            .any(|e| e.kind == IssueKind::Parse && e.subject == "Misc.txt")
    );
    assert_eq!(count_items(&conn, ItemKind::Rune).unwrap(), 0);
    assert_eq!(report.stats_for(ItemKind::Unique).imported, 1);
    assert_eq!(report.stats_for(ItemKind::Runeword).imported, 1);
    assert!(report.log_id.is_some());
}

#[test]
fn rejected_manifest_lines_are_reported() {
    let tmp = tempfile::TempDir::new().unwrap();
    let images = tmp.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::write(images.join("images.tsv"), "El Rune\tel.png\n\tnoname.png\n").unwrap();
    let conn = open_memory().unwrap();
    let blobs = MemoryBlobStore::default();

    let opts = ImportOptions {
        image_dir: Some(images),
        ..Default::default()
    };
    let report = run_import(&conn, &blobs, &FakeFetcher::default(), &opts, &SilentProgress).unwrap();

    let manifest_issues: Vec<_> = report
        .errors
        .iter()
        .filter(|e| e.kind == IssueKind::Parse && e.subject.starts_with("images.tsv"))
        .collect();
    assert_eq!(manifest_issues.len(), 1);
}
