//! Manufacturing exports: Gerber manifest and bill of materials.
//!
//! No file content is produced. Gerber sizes come from the random source.

use std::collections::HashMap;

use chrono::Utc;

use super::random::RandomSource;
use super::store::BoardStore;
use crate::core::ConnectorResult;
use crate::schema::*;

/// Non-copper files emitted for every Gerber export: (suffix, layer, type)
const STANDARD_FILES: [(&str, &str, GerberFileType); 8] = [
    ("F_Mask.gbr", "Top Soldermask", GerberFileType::Soldermask),
    ("B_Mask.gbr", "Bottom Soldermask", GerberFileType::Soldermask),
    ("F_Silkscreen.gbr", "Top Silkscreen", GerberFileType::Silkscreen),
    ("B_Silkscreen.gbr", "Bottom Silkscreen", GerberFileType::Silkscreen),
    ("F_Paste.gbr", "Top Paste", GerberFileType::Paste),
    ("B_Paste.gbr", "Bottom Paste", GerberFileType::Paste),
    ("PTH.drl", "Drill", GerberFileType::Drill),
    ("Edge_Cuts.gbr", "Outline", GerberFileType::Outline),
];

fn file_size(rng: &mut dyn RandomSource, low: f64, high: f64) -> u64 {
    rng.range(low, high).floor() as u64
}

type PartKey = (Option<String>, Option<String>);

fn part_key(component: &Component) -> PartKey {
    (component.part_number.clone(), component.value.clone())
}

fn describe(component: &Component) -> String {
    match &component.value {
        Some(value) => format!("{} {}", value, component.package),
        None => component.package.clone(),
    }
}

impl BoardStore {
    pub fn export_gerber(
        &self,
        board_id: &str,
        options: &GerberOptions,
        rng: &mut dyn RandomSource,
    ) -> ConnectorResult<GerberExport> {
        let board = self.board(board_id)?;
        let layers: Vec<String> = match &options.layers {
            Some(names) => names.clone(),
            None => board.layers.iter().map(|l| l.name.clone()).collect(),
        };

        let mut files: Vec<GerberFile> = layers
            .iter()
            .map(|layer| GerberFile {
                name: format!("{}_{}_Cu.gbr", board.id, layer.replace(' ', "_")),
                layer: layer.clone(),
                file_type: GerberFileType::Copper,
                size: file_size(rng, 50_000.0, 150_000.0),
            })
            .collect();
        files.extend(STANDARD_FILES.iter().map(|(suffix, layer, file_type)| GerberFile {
            name: format!("{}_{}", board.id, suffix),
            layer: layer.to_string(),
            file_type: *file_type,
            size: file_size(rng, 5_000.0, 25_000.0),
        }));

        Ok(GerberExport {
            board_id: board_id.to_string(),
            format: options.format,
            units: options.units,
            total_size: files.iter().map(|f| f.size).sum(),
            files,
            generated_at: Utc::now(),
        })
    }

    pub fn export_bom(&self, board_id: &str, options: &BomOptions) -> ConnectorResult<BomExport> {
        let board = self.board(board_id)?;

        let mut entries: Vec<BomEntry> = Vec::new();
        let mut index: HashMap<PartKey, usize> = HashMap::new();
        for component in &board.components {
            let key = part_key(component);
            if options.group_by_value {
                if let Some(&i) = index.get(&key) {
                    let entry = &mut entries[i];
                    entry.designator = format!("{}, {}", entry.designator, component.designator);
                    entry.quantity += 1;
                    continue;
                }
            }
            index.entry(key).or_insert(entries.len());
            entries.push(BomEntry {
                designator: component.designator.clone(),
                part_number: component.part_number.clone(),
                value: component.value.clone(),
                package: component.package.clone(),
                quantity: 1,
                manufacturer: None,
                description: describe(component),
            });
        }

        Ok(BomExport {
            board_id: board_id.to_string(),
            entries,
            total_components: board.components.len(),
            unique_parts: index.len(),
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::random::ScriptedRandom;
    use crate::connector::seed::DEMO_BOARD_ID;

    #[test]
    fn test_gerber_manifest_for_all_layers() {
        let store = BoardStore::with_demo_data();
        let mut rng = ScriptedRandom::constant(0.5);
        let export = store
            .export_gerber(DEMO_BOARD_ID, &GerberOptions::default(), &mut rng)
            .unwrap();
        assert_eq!(export.files.len(), 4 + 8);
        assert_eq!(export.files[0].name, "BRD001_Top_Cu.gbr");
        assert_eq!(export.files[0].size, 100_000);
        assert_eq!(export.files[4].size, 15_000);
        assert_eq!(export.total_size, 4 * 100_000 + 8 * 15_000);
        assert_eq!(export.format, GerberFormat::Rs274x);
        assert_eq!(export.units, Units::Mm);
    }

    #[test]
    fn test_gerber_requested_layers_only() {
        let store = BoardStore::with_demo_data();
        let mut rng = ScriptedRandom::constant(0.0);
        let options = GerberOptions {
            layers: Some(vec!["Top".to_string(), "Bottom".to_string()]),
            format: GerberFormat::Rs274d,
            units: Units::Inch,
        };
        let export = store.export_gerber(DEMO_BOARD_ID, &options, &mut rng).unwrap();
        let copper = export.files.iter().filter(|f| f.file_type == GerberFileType::Copper).count();
        assert_eq!(copper, 2);
        assert_eq!(export.files.len(), 10);
        assert!(export.files.iter().any(|f| f.file_type == GerberFileType::Drill));
        assert_eq!(serde_json::to_value(export.format).unwrap(), "RS-274D");
    }

    #[test]
    fn test_bom_grouped_by_part_and_value() {
        let store = BoardStore::with_demo_data();
        let bom = store.export_bom(DEMO_BOARD_ID, &BomOptions::grouped()).unwrap();
        assert_eq!(bom.total_components, 8);
        // C1/C2 and R1/R2 collapse
        assert_eq!(bom.entries.len(), 6);
        assert_eq!(bom.unique_parts, 6);
        let caps = bom.entries.iter().find(|e| e.value.as_deref() == Some("100nF")).unwrap();
        assert_eq!(caps.designator, "C1, C2");
        assert_eq!(caps.quantity, 2);
        assert!(bom.entries.iter().all(|e| e.manufacturer.is_none()));
    }

    #[test]
    fn test_bom_flat_lists_every_component() {
        let store = BoardStore::with_demo_data();
        let bom = store.export_bom(DEMO_BOARD_ID, &BomOptions::default()).unwrap();
        assert_eq!(bom.entries.len(), 8);
        assert_eq!(bom.unique_parts, 6);
        assert!(bom.entries.iter().all(|e| e.quantity == 1));
        assert_eq!(bom.entries[0].description, "STM32F411CEU6 LQFP-48");
    }
}
