//! Integration tests running the extractor against synthetic caches on disk.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use jagcache_formats::{FormatError, FrameBuilder, IndexLayout, IndexTable, archive, wav};
use jagcache_storage::{
    ArchiveError, CacheFileKind, ExtractOptions, Extractor, ReadError, StorageError,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATA_FILE: &str = "main_file_cache.dat2";

/// Archive holding the given sample payloads
fn sample_archive(payloads: &[&[u8]]) -> Vec<u8> {
    let body = payloads
        .iter()
        .fold(FrameBuilder::new().header([0xCA, 0xFE, 0x00, 0x01]), |b, p| {
            b.payload(p.to_vec())
        })
        .build();
    archive::compress(&body).expect("compress")
}

struct Cache {
    dir: TempDir,
}

impl Cache {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn cache_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("cache")
    }

    fn output_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("out")
    }

    fn write(&self, name: &str, bytes: &[u8]) {
        fs::create_dir_all(self.cache_dir()).unwrap();
        fs::write(self.cache_dir().join(name), bytes).unwrap();
    }

    fn options(&self) -> ExtractOptions {
        ExtractOptions::new(self.cache_dir()).with_output_dir(self.output_dir())
    }
}

fn read_samples(path: &Path) -> Vec<u8> {
    let data = wav::read_wav(path).expect("read wav");
    assert_eq!(data.channels, 1);
    assert_eq!(data.sample_width, 1);
    data.samples
}

#[test]
fn failures_are_isolated_per_archive() {
    let cache = Cache::new();

    let a0 = sample_archive(&[&[0x80; 10], b"abc"]);
    let a1 = vec![1u8, 2, 3, 4, 5];
    let a3 = vec![0x10, 0, 0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF];
    let a4 = sample_archive(&[&[0x00, 0x7F, 0xFF, 0x01]]);
    let a5 = sample_archive(&[b"truncated"]);

    let sizes = [
        a0.len() as u16,
        a1.len() as u16,
        0,
        a3.len() as u16,
        a4.len() as u16,
        a5.len() as u16 + 100,
    ];
    let data = [a0, a1, a3, a4, a5].concat();
    cache.write(DATA_FILE, &data);
    cache.write("main_file_cache.idx4", &IndexTable::build(&sizes).unwrap());

    let extractor = Extractor::new(cache.options()).unwrap();
    let report = extractor.extract_category(4).expect("category");

    assert_eq!(report.declared_count, 6);
    assert_eq!(report.layout, IndexLayout::DeclaredCount);
    assert_eq!(report.skipped_empty, 1);
    assert_eq!(report.extracted_count(), 3);
    assert_eq!(report.failure_count(), 3);

    let written: Vec<(usize, usize)> = report.assets().map(|a| (a.archive, a.entry)).collect();
    assert_eq!(written, vec![(0, 0), (0, 1), (4, 0)]);

    let failed: Vec<usize> = report.failures().map(ArchiveError::archive).collect();
    assert_eq!(failed, vec![1, 3, 5]);

    let failures: Vec<&ArchiveError> = report.failures().collect();
    assert!(matches!(
        failures[0],
        ArchiveError::Decode {
            source: FormatError::ArchiveTooShort { len: 5, .. },
            ..
        }
    ));
    assert!(matches!(
        failures[1],
        ArchiveError::Decode {
            source: FormatError::DecompressionFailed(_),
            ..
        }
    ));
    assert!(matches!(
        failures[2],
        ArchiveError::Read {
            source: ReadError::TruncatedRead { .. },
            ..
        }
    ));

    let out = cache.output_dir().join("idx4");
    assert_eq!(read_samples(&out.join("idx4_archive0_entry0.wav")), vec![0x80; 10]);
    assert_eq!(read_samples(&out.join("idx4_archive0_entry1.wav")), b"abc");
    assert_eq!(
        read_samples(&out.join("idx4_archive4_entry0.wav")),
        vec![0x00, 0x7F, 0xFF, 0x01]
    );
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3);
}

#[test]
fn legacy_index_layout() {
    let cache = Cache::new();

    let a0 = sample_archive(&[b"first"]);
    let a1 = sample_archive(&[b"second", b"third"]);
    let mut index = Vec::new();
    index.extend_from_slice(&(a0.len() as u16).to_le_bytes());
    index.extend_from_slice(&(a1.len() as u16).to_le_bytes());

    cache.write(DATA_FILE, &[a0, a1].concat());
    cache.write("main_file_cache.idx15", &index);

    let report = Extractor::new(cache.options())
        .unwrap()
        .extract_category(15)
        .expect("category");

    assert_eq!(report.layout, IndexLayout::Legacy);
    assert_eq!(report.declared_count, 2);
    let names: Vec<String> = report
        .assets()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "idx15_archive0_entry0.wav",
            "idx15_archive1_entry0.wav",
            "idx15_archive1_entry1.wav",
        ]
    );
}

#[test]
fn missing_data_file_is_fatal() {
    let cache = Cache::new();
    cache.write("main_file_cache.idx4", &IndexTable::build(&[10]).unwrap());

    let extractor = Extractor::new(cache.options()).unwrap();
    assert!(matches!(
        extractor.extract_category(4),
        Err(StorageError::NotFound {
            kind: CacheFileKind::Data,
            ..
        })
    ));
    assert!(extractor.extract_all().is_err());
    assert!(!cache.output_dir().exists());
}

#[test]
fn missing_index_file() {
    let cache = Cache::new();
    cache.write(DATA_FILE, &[]);

    let err = Extractor::new(cache.options())
        .unwrap()
        .extract_category(14)
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotFound {
            kind: CacheFileKind::Index,
            ..
        }
    ));
}

#[test]
fn extract_all_continues_past_missing_categories() {
    let cache = Cache::new();
    let a0 = sample_archive(&[b"only"]);
    cache.write("main_file_cache.idx4", &IndexTable::build(&[a0.len() as u16]).unwrap());
    cache.write(DATA_FILE, &a0);

    let extractor = Extractor::new(cache.options().with_categories(vec![4, 14, 15])).unwrap();
    let summary = extractor.extract_all().expect("run");

    let categories: Vec<u32> = summary.categories.iter().map(|c| c.category).collect();
    assert_eq!(categories, vec![4, 14, 15]);
    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.total_extracted(), 1);
    assert!(!summary.nothing_processed());
    assert!(
        summary.categories[1..]
            .iter()
            .all(|c| c.result.as_ref().is_err_and(StorageError::is_not_found))
    );
}

#[test]
fn extraction_is_deterministic() {
    let cache = Cache::new();
    let a0 = sample_archive(&[b"one", b"two"]);
    let a1 = sample_archive(&[b"three"]);
    cache.write(
        "main_file_cache.idx14",
        &IndexTable::build(&[a0.len() as u16, a1.len() as u16]).unwrap(),
    );
    cache.write(DATA_FILE, &[a0, a1].concat());

    let extractor = Extractor::new(cache.options()).unwrap();
    let first = extractor.extract_category(14).unwrap();
    let second = extractor.extract_category(14).unwrap();

    let first: Vec<_> = first.assets().cloned().collect();
    let second: Vec<_> = second.assets().cloned().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn custom_sample_rate_is_written() {
    let cache = Cache::new();
    let a0 = sample_archive(&[b"rate"]);
    cache.write("main_file_cache.idx4", &IndexTable::build(&[a0.len() as u16]).unwrap());
    cache.write(DATA_FILE, &a0);

    let report = Extractor::new(cache.options().with_sample_rate(11025))
        .unwrap()
        .extract_category(4)
        .unwrap();
    let asset = report.assets().next().expect("asset");
    assert_eq!(asset.sample_count, 4);
    assert_eq!(wav::read_wav(&asset.path).unwrap().sample_rate, 11025);
}

#[test]
fn large_archives_are_extracted() {
    let cache = Cache::new();
    let long: Vec<u8> = (0..i16::MAX as usize).map(|i| (i % 97) as u8).collect();
    let a0 = sample_archive(&[&long[..], &long[..], &long[..]]);
    assert!(a0.len() < usize::from(u16::MAX));

    cache.write("main_file_cache.idx14", &IndexTable::build(&[a0.len() as u16]).unwrap());
    cache.write(DATA_FILE, &a0);

    let report = Extractor::new(cache.options())
        .unwrap()
        .extract_category(14)
        .expect("category");

    assert_eq!(report.failure_count(), 0);
    assert_eq!(report.extracted_count(), 3);
    for asset in report.assets() {
        assert_eq!(asset.sample_count, long.len());
        assert_eq!(read_samples(&asset.path), long);
    }
}
