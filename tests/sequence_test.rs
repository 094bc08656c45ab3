//! Integration tests for scanning and sequencing an export tree

use plyseq::sequence::{scan_export_dir, write_export_archive, EXPORT_ARCHIVE_NAME};
use plyseq::{Arch, Classifier, Sequencer};
use std::fs;
use std::io::Read;
use tempfile::TempDir;

fn write_mesh(root: &TempDir, folder: &str, name: &str) {
    let dir = root.path().join("Patient 042").join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), format!("{}/{}", folder, name)).unwrap();
}

fn payload(pair: &plyseq::SequencePair, arch: Arch) -> Vec<String> {
    pair.stream(arch)
        .iter()
        .map(|a| String::from_utf8(a.data().to_vec()).unwrap())
        .collect()
}

#[test]
fn test_export_tree_orders_into_aligned_streams() {
    let root = TempDir::new().unwrap();
    for folder in [
        "Case EXPORT",
        "Case EXPORT_STEP10",
        "Case EXPORT_STEP2",
        "Case EXPORT_STEP2_SUBSETUP1",
        "Case EXPORT_STEP1",
    ] {
        write_mesh(&root, folder, "Maxillary.production.ply");
        write_mesh(&root, folder, "Mandibular.production.ply");
    }
    write_mesh(&root, "Case EXPORT_STEP1", "notes.txt");
    write_mesh(&root, "Case EXPORT_STEP1", "Maxillary.preview.ply");

    let classifier = Classifier::default();
    let assets = scan_export_dir(root.path(), &classifier).unwrap();
    assert_eq!(assets.len(), 10);

    let pair = Sequencer::new(classifier).sequence(&assets);
    assert_eq!(pair.step_count(), 5);
    assert_eq!(
        payload(&pair, Arch::Maxillary),
        [
            "Case EXPORT_STEP1/Maxillary.production.ply",
            "Case EXPORT_STEP2_SUBSETUP1/Maxillary.production.ply",
            "Case EXPORT_STEP2/Maxillary.production.ply",
            "Case EXPORT_STEP10/Maxillary.production.ply",
            "Case EXPORT/Maxillary.production.ply",
        ]
    );
    assert_eq!(pair.get(Arch::Mandibular, 4).unwrap().folder(), "Case EXPORT");
}

#[test]
fn test_export_names_follow_stream_position() {
    let root = TempDir::new().unwrap();
    write_mesh(&root, "EXPORT_STEP2", "Maxillary.production.ply");
    write_mesh(&root, "EXPORT_STEP1", "Maxillary.production.ply");
    write_mesh(&root, "EXPORT_STEP1", "Mandibular.production.ply");

    let classifier = Classifier::default();
    let assets = scan_export_dir(root.path(), &classifier).unwrap();
    let pair = Sequencer::new(classifier.clone()).sequence(&assets);

    let exported = pair.export_assets();
    let names: Vec<&str> = exported.iter().map(|a| a.name()).collect();
    assert_eq!(names, ["Mandibular1.ply", "Maxillary1.ply", "Maxillary2.ply"]);
    assert_eq!(exported[2].data().as_ref(), b"EXPORT_STEP2/Maxillary.production.ply");

    // Exported names still classify into the stream they came from.
    assert_eq!(classifier.classify(names[0]), Arch::Mandibular);
    assert_eq!(classifier.classify(names[2]), Arch::Maxillary);
}

#[test]
fn test_missing_export_root_is_an_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope");
    assert!(scan_export_dir(&missing, &Classifier::default()).is_err());
}

#[test]
fn test_scanned_export_packages_into_archive() {
    let root = TempDir::new().unwrap();
    write_mesh(&root, "EXPORT_STEP2", "Mandibular.production.ply");
    write_mesh(&root, "EXPORT_STEP1", "Mandibular.production.ply");
    write_mesh(&root, "EXPORT_STEP1", "Maxillary.production.ply");

    let classifier = Classifier::default();
    let assets = scan_export_dir(root.path(), &classifier).unwrap();
    let pair = Sequencer::new(classifier).sequence(&assets);

    let out = root.path().join(EXPORT_ARCHIVE_NAME);
    let file = fs::File::create(&out).unwrap();
    write_export_archive(&pair, file).unwrap();

    let mut zip = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["Mandibular1.ply", "Mandibular2.ply", "Maxillary1.ply"]);

    let mut second = String::new();
    zip.by_name("Mandibular2.ply")
        .unwrap()
        .read_to_string(&mut second)
        .unwrap();
    assert_eq!(second, "EXPORT_STEP2/Mandibular.production.ply");
}
