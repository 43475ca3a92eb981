mod common;

use common::{FakeFetcher, png};
use horadric_catalog::{CatalogItem, ItemKind};
use horadric_db::*;
use horadric_import::*;
use horadric_media::{BlobStore, ImageAsset, ImageSource, MemoryBlobStore};
use horadric_source::ImageMap;
use rusqlite::Connection;

const BASE_URL: &str = "https://img.example.com/catalog/";

fn add(conn: &Connection, kind: ItemKind, name: &str) -> CatalogItem {
    let id = insert_item(conn, &CatalogItem::new(kind, name)).unwrap();
    get_item(conn, kind, id).unwrap().unwrap()
}

fn declared<'a>(entries: &[(&CatalogItem, &str)]) -> ImageSources<'a> {
    ImageSources {
        declared: entries
            .iter()
            .map(|(item, path)| ((item.kind, item.id), path.to_string()))
            .collect(),
        base_url: Some(BASE_URL),
        image_map: None,
    }
}

#[test]
fn identical_content_is_written_once() {
    let conn = open_memory().unwrap();
    let a = add(&conn, ItemKind::Unique, "Shako");
    let b = add(&conn, ItemKind::Unique, "Harlequin Crest");

    let icon = png(4, [200, 10, 10, 255]);
    let fetcher = FakeFetcher::default()
        .with(&format!("{BASE_URL}a.png"), icon.clone())
        .with(&format!("{BASE_URL}b.png"), icon.clone());
    let blobs = MemoryBlobStore::default();
    let pipeline = ImagePipeline::new(&blobs, &fetcher);

    let sources = declared(&[(&a, "a.png"), (&b, "b.png")]);
    let first = pipeline.process(&conn, &a, sources.lookup(&a));
    let second = pipeline.process(&conn, &b, sources.lookup(&b));

    let (ImageOutcome::Uploaded(x), ImageOutcome::Reused(y)) = (&first, &second) else {
        panic!("unexpected outcomes: {first:?}, {second:?}");
    };
    assert_eq!(x, y);
    assert_eq!(blobs.writes(), 1);
    assert_eq!(x.key, ImageAsset::new(icon).key());

    let a_row = get_item(&conn, ItemKind::Unique, a.id).unwrap().unwrap();
    let b_row = get_item(&conn, ItemKind::Unique, b.id).unwrap().unwrap();
    assert_eq!(a_row.image_url, b_row.image_url);
    assert_eq!(a_row.image_key.as_deref(), Some(x.key.as_str()));
}

#[test]
fn existing_blob_is_not_rewritten() {
    let conn = open_memory().unwrap();
    let item = add(&conn, ItemKind::Rune, "El Rune");
    let icon = png(4, [1, 2, 3, 255]);
    let blobs = MemoryBlobStore::default();
    let key = ImageAsset::new(icon.clone()).key();
    blobs.put(&key, &icon, "image/png").unwrap();

    let fetcher = FakeFetcher::default().with(&format!("{BASE_URL}el.png"), icon);
    let pipeline = ImagePipeline::new(&blobs, &fetcher);
    let sources = declared(&[(&item, "el.png")]);

    let outcome = pipeline.process(&conn, &item, sources.lookup(&item));
    assert!(matches!(outcome, ImageOutcome::Reused(_)));
    assert_eq!(blobs.writes(), 1);
}

#[test]
fn rows_with_images_are_skipped_unless_forced() {
    let conn = open_memory().unwrap();
    let mut item = add(&conn, ItemKind::Unique, "Shako");
    update_item_image(&conn, ItemKind::Unique, item.id, "https://old/url.png", "items/old.png")
        .unwrap();
    item = get_item(&conn, ItemKind::Unique, item.id).unwrap().unwrap();

    let fetcher = FakeFetcher::default().with(&format!("{BASE_URL}new.png"), png(2, [0, 0, 0, 255]));
    let blobs = MemoryBlobStore::default();
    let sources = declared(&[(&item, "new.png")]);

    let outcome = ImagePipeline::new(&blobs, &fetcher).process(&conn, &item, sources.lookup(&item));
    assert_eq!(outcome, ImageOutcome::AlreadySet);
    assert_eq!(fetcher.fetches(), 0);

    let forced = ImagePipeline::new(&blobs, &fetcher)
        .force(true)
        .process(&conn, &item, sources.lookup(&item));
    assert!(matches!(forced, ImageOutcome::Uploaded(_)));
    let row = get_item(&conn, ItemKind::Unique, item.id).unwrap().unwrap();
    assert_ne!(row.image_url.as_deref(), Some("https://old/url.png"));
}

#[test]
fn failed_fetch_keeps_old_url() {
    let conn = open_memory().unwrap();
    let mut item = add(&conn, ItemKind::Unique, "Shako");
    update_item_image(&conn, ItemKind::Unique, item.id, "https://old/url.png", "items/old.png")
        .unwrap();
    item = get_item(&conn, ItemKind::Unique, item.id).unwrap().unwrap();

    let fetcher = FakeFetcher::default();
    let blobs = MemoryBlobStore::default();
    let sources = declared(&[(&item, "gone.png")]);

    let outcome = ImagePipeline::new(&blobs, &fetcher)
        .force(true)
        .process(&conn, &item, sources.lookup(&item));
    assert!(matches!(outcome, ImageOutcome::Failed(_)));
    let row = get_item(&conn, ItemKind::Unique, item.id).unwrap().unwrap();
    assert_eq!(row.image_url.as_deref(), Some("https://old/url.png"));
    assert!(blobs.is_empty());
}

#[test]
fn image_map_lookups() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("el.png"), png(2, [9, 9, 9, 255])).unwrap();
    let map = ImageMap::parse_str(
        "images.tsv",
        "name\tfile\nEl Rune\tel.png\nTal Rune\ttal.png\n",
        tmp.path(),
    )
    .unwrap();

    let conn = open_memory().unwrap();
    let el = add(&conn, ItemKind::Rune, "El Rune");
    let tal = add(&conn, ItemKind::Rune, "Tal Rune");
    let ort = add(&conn, ItemKind::Rune, "Ort Rune");

    let sources = ImageSources {
        image_map: Some(&map),
        ..Default::default()
    };
    assert_eq!(
        sources.lookup(&el),
        SourceLookup::Found(ImageSource::Local(tmp.path().join("el.png")))
    );

    let fetcher = FakeFetcher::default();
    let blobs = MemoryBlobStore::default();
    let pipeline = ImagePipeline::new(&blobs, &fetcher);
    assert!(matches!(
        pipeline.process(&conn, &tal, sources.lookup(&tal)),
        ImageOutcome::MissingFile(p) if p == tmp.path().join("tal.png")
    ));
    assert_eq!(pipeline.process(&conn, &ort, sources.lookup(&ort)), ImageOutcome::NotFound);
    assert!(matches!(
        pipeline.process(&conn, &el, sources.lookup(&el)),
        ImageOutcome::Uploaded(_)
    ));
}

#[test]
fn declared_path_without_base_url_is_invalid() {
    let conn = open_memory().unwrap();
    let item = add(&conn, ItemKind::Unique, "Shako");
    let sources = ImageSources {
        declared: [((item.kind, item.id), "img/shako.png".to_string())].into(),
        ..Default::default()
    };
    assert!(matches!(sources.lookup(&item), SourceLookup::Invalid(_)));
}

#[test]
fn dry_run_plans_without_fetching() {
    let conn = open_memory().unwrap();
    let item = add(&conn, ItemKind::Unique, "Shako");
    let fetcher = FakeFetcher::default();
    let blobs = MemoryBlobStore::default();
    let sources = declared(&[(&item, "/img/shako.png")]);

    let outcome = ImagePipeline::new(&blobs, &fetcher)
        .dry_run(true)
        .process(&conn, &item, sources.lookup(&item));
    assert_eq!(
        outcome,
        ImageOutcome::Planned(ImageSource::Remote(
            "https://img.example.com/img/shako.png".to_string()
        ))
    );
    assert_eq!(fetcher.fetches(), 0);
    assert!(blobs.is_empty());
    let row = get_item(&conn, ItemKind::Unique, item.id).unwrap().unwrap();
    assert!(row.image_url.is_none());
}

#[test]
fn run_images_collects_outcomes() {
    let conn = open_memory().unwrap();
    let el = add(&conn, ItemKind::Rune, "El Rune");
    add(&conn, ItemKind::Rune, "Tal Rune");

    let fetcher = FakeFetcher::default().with(&format!("{BASE_URL}el.png"), png(2, [5, 5, 5, 255]));
    let blobs = MemoryBlobStore::default();
    let pipeline = ImagePipeline::new(&blobs, &fetcher);
    let sources = declared(&[(&el, "el.png")]);

    let phase = run_images(&conn, &pipeline, &sources, &Deadline::none(), &SilentProgress).unwrap();
    assert_eq!(phase.stats.uploaded, 1);
    assert_eq!(phase.stats.not_found, 1);
    assert_eq!(phase.missing, vec!["Tal Rune".to_string()]);
    assert!(!phase.timed_out);
}
