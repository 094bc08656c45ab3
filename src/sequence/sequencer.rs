use crate::asset::{Asset, Classifier};
use log::debug;
use std::collections::HashMap;

use super::ordering::OrderingKey;
use super::pair::SequencePair;

/// Groups a flat batch of files into step-ordered maxillary/mandibular streams.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    classifier: Classifier,
}

struct FolderGroup<'a> {
    key: OrderingKey,
    assets: Vec<&'a Asset>,
}

impl Sequencer {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn sequence(&self, assets: &[Asset]) -> SequencePair {
        // Folders in first-discovery order; the sort below is stable.
        let mut groups: Vec<FolderGroup<'_>> = Vec::new();
        let mut by_folder: HashMap<&str, usize> = HashMap::new();
        for asset in assets {
            let slot = *by_folder.entry(asset.folder()).or_insert_with(|| {
                groups.push(FolderGroup {
                    key: OrderingKey::for_folder(asset.folder()),
                    assets: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].assets.push(asset);
        }
        groups.sort_by_key(|group| group.key);

        let mut pair = SequencePair::default();
        let mut dropped = 0usize;
        for group in &groups {
            for asset in &group.assets {
                match self.classifier.classify_mesh(asset.name()) {
                    Some(arch) => pair.push(arch, (*asset).clone()),
                    None => dropped += 1,
                }
            }
        }

        debug!(
            "sequence: folders={} maxillary={} mandibular={} dropped={}",
            groups.len(),
            pair.maxillary().len(),
            pair.mandibular().len(),
            dropped
        );
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Arch;

    fn asset(folder: &str, name: &str) -> Asset {
        Asset::new(folder, name, format!("{}/{}", folder, name).into_bytes())
    }

    fn folders(pair: &SequencePair, arch: Arch) -> Vec<String> {
        pair.stream(arch)
            .iter()
            .map(|a| a.folder().to_string())
            .collect()
    }

    #[test]
    fn orders_streams_by_folder_step() {
        let input = vec![
            asset("EXPORT_STEP2", "Maxillary.production.ply"),
            asset("EXPORT_STEP2", "Mandibular.production.ply"),
            asset("EXPORT", "Maxillary.production.ply"),
            asset("EXPORT_STEP1_Subsetup2", "Mandibular.production.ply"),
            asset("EXPORT_STEP1_Subsetup2", "Maxillary.production.ply"),
            asset("EXPORT_STEP1", "Maxillary.production.ply"),
            asset("EXPORT_STEP1", "notes.txt"),
        ];
        let pair = Sequencer::default().sequence(&input);

        assert_eq!(
            folders(&pair, Arch::Maxillary),
            vec!["EXPORT_STEP1_Subsetup2", "EXPORT_STEP1", "EXPORT_STEP2", "EXPORT"]
        );
        assert_eq!(
            folders(&pair, Arch::Mandibular),
            vec!["EXPORT_STEP1_Subsetup2", "EXPORT_STEP2"]
        );
    }

    #[test]
    fn non_mesh_files_are_dropped_silently() {
        let input = vec![
            asset("EXPORT_STEP1", "notes.txt"),
            asset("EXPORT_STEP1", "Maxillary.stl"),
        ];
        let pair = Sequencer::default().sequence(&input);
        assert!(pair.is_empty());
    }

    #[test]
    fn output_is_deterministic_with_duplicates() {
        let input = vec![
            asset("EXPORT_STEP3", "Mandibular.production.ply"),
            asset("misc", "Maxillary.production.ply"),
            asset("EXPORT_STEP3", "Mandibular.production.ply"),
            asset("EXPORT_STEP1", "Mandibular.production.ply"),
            asset("misc", "Maxillary.production.ply"),
        ];
        let sequencer = Sequencer::default();
        let first = sequencer.sequence(&input);
        let second = sequencer.sequence(&input);
        assert_eq!(first, second);
        assert_eq!(
            folders(&first, Arch::Mandibular),
            vec!["EXPORT_STEP1", "EXPORT_STEP3", "EXPORT_STEP3"]
        );
        // Unrecognised folder names order as step 0.
        assert_eq!(folders(&first, Arch::Maxillary), vec!["misc", "misc"]);
    }

    #[test]
    fn folder_split_across_input_is_grouped_at_first_sighting() {
        let input = vec![
            asset("EXPORT_STEP1", "Maxillary_a.production.ply"),
            asset("EXPORT_STEP1_Subsetup1", "Maxillary.production.ply"),
            asset("EXPORT_STEP1", "Maxillary_b.production.ply"),
        ];
        let pair = Sequencer::default().sequence(&input);
        let names: Vec<_> = pair.maxillary().iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "Maxillary.production.ply",
                "Maxillary_a.production.ply",
                "Maxillary_b.production.ply"
            ]
        );
    }
}
