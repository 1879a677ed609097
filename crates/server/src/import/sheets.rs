//! Workbook-to-catalogue import.
//!
//! Each sheet of the source workbook maps 1:1 to a product category and
//! carries its own attribute columns. Rows are normalized and upserted
//! by SKU; a bad row is logged and skipped, a bad sheet is logged and
//! the batch moves on to the next one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use comptoir_core::{Category, ProductSpecs};

use crate::config::ServerConfig;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

use super::images::resolve_image_url;
use super::normalize::{clean_string, normalize_header, parse_float_prefix, round_half_up};

/// The fixed sheet list of the source workbook, in import order.
pub const SHEETS: [&str; 11] = [
    "RESEAUX- NAS",
    "ACCESSOIRES",
    "PC",
    "ECRANS",
    "ROBOT EPSON",
    "ONDULEURS",
    "IMPRIMANTES & SCANNERS",
    "CABLES",
    "TELEPHONE IP",
    "OCCASIONS",
    "LOGICIELS",
];

/// Errors that abort a single sheet (not the whole batch).
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Workbook could not be opened or the sheet is missing/unreadable.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// Database upsert failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outcome of importing one sheet.
#[derive(Debug, Clone)]
pub struct SheetReport {
    pub sheet: String,
    pub imported: usize,
    pub skipped: usize,
}

/// Outcome of a whole-workbook import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub reports: Vec<SheetReport>,
    pub failed_sheets: Vec<String>,
}

impl ImportSummary {
    #[must_use]
    pub fn imported(&self) -> usize {
        self.reports.iter().map(|r| r.imported).sum()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.reports.iter().map(|r| r.skipped).sum()
    }
}

/// One spreadsheet row, keyed by normalized column header.
pub struct SheetRow {
    cells: HashMap<String, Data>,
}

impl SheetRow {
    fn new(headers: &[String], cells: &[Data]) -> Self {
        let cells = headers
            .iter()
            .zip(cells)
            .map(|(header, cell)| (header.clone(), cell.clone()))
            .collect();
        Self { cells }
    }

    /// Cell text under a normalized header, whitespace-collapsed.
    /// Missing columns and empty cells both read as `""`.
    fn text(&self, key: &str) -> String {
        match self.cells.get(key) {
            None | Some(Data::Empty) => String::new(),
            Some(cell) => clean_string(&cell.to_string()),
        }
    }

    /// Cell value under a normalized header parsed as a float.
    /// Unparseable or missing values are absent, never zero.
    fn price(&self, key: &str) -> Option<f64> {
        match self.cells.get(key)? {
            Data::Float(f) => Some(*f),
            Data::Int(i) => {
                #[allow(clippy::cast_precision_loss)]
                Some(*i as f64)
            }
            Data::String(s) => parse_float_prefix(s),
            _ => None,
        }
    }
}

/// Category for a known sheet name (already normalized).
fn sheet_category(normalized_sheet: &str) -> Option<Category> {
    let category = match normalized_sheet {
        "reseaux- nas" => Category::NetworkNas,
        "accessoires" => Category::Accessories,
        "pc" => Category::Computers,
        "ecrans" => Category::Monitors,
        "robot epson" => Category::EpsonRobot,
        "onduleurs" => Category::Ups,
        "imprimantes & scanners" => Category::PrintersScanners,
        "cables" => Category::Cables,
        "telephone ip" => Category::IpTelephony,
        "occasions" => Category::UsedEquipment,
        "logiciels" => Category::Software,
        _ => return None,
    };
    Some(category)
}

/// Extract the category-specific attribute bag from a row.
///
/// Only whitelisted columns are read; anything else in the sheet is
/// dropped. Unknown-sheet fallbacks get an empty bag.
fn extract_specs(category: Category, row: &SheetRow) -> serde_json::Value {
    match category {
        Category::NetworkNas => {
            let poe = row.text("poe");
            let poe_power = row.text("puissance poe");
            let alim = row.text("alim externe").to_lowercase();
            serde_json::json!({
                "racks": row.text("nombre de ports/ baies"),
                "poe": if poe.is_empty() { "non".to_owned() } else { poe },
                "poePower": if poe_power.is_empty() { "0 W".to_owned() } else { poe_power },
                "alim": if alim.is_empty() { "non".to_owned() } else { alim },
            })
        }
        Category::Accessories | Category::EpsonRobot => serde_json::json!({
            "cable": row.text("cordon inclus"),
        }),
        Category::Computers => serde_json::json!({
            "cpu": row.text("processeur"),
            "cputype": row.text("version du processeur"),
            "ram": row.text("memoire"),
            "stockage": row.text("stockage"),
            "gpu": row.text("carte graphique"),
            "screen": row.text("ecran"),
            "network": row.text("reseaux"),
            "burner": row.text("graveur dvi"),
            "connections": row.text("connexions"),
            "alim": row.text("alim externe"),
            "os": row.text("os"),
        }),
        Category::Monitors => serde_json::json!({
            "displaysize": row.text("taille diagonale"),
            "connections": row.text("connexions"),
            "resolution": row.text("resolution"),
            "contrast": row.text("taux de contraste"),
            "medicalCE": row.text("ce medical"),
            "support": row.text("type de support"),
            "cord": row.text("cordon inclus"),
            "captor": row.text("capteur / sonde"),
        }),
        Category::Ups | Category::UsedEquipment => serde_json::json!({
            "description3": row.text("commentaires 3"),
        }),
        Category::PrintersScanners => serde_json::json!({
            "rectoverso": row.text("recto - verso"),
            "charger": row.text("chargeur"),
            "norm": row.text("norme"),
            "cable": row.text("type de connecteur"),
            "cord": row.text("cordon inclus"),
            "optionbac": row.text("option bac sup"),
            "alim": row.text("alim externe"),
        }),
        Category::Cables => serde_json::json!({
            "type": row.text("type"),
            "cord": row.text("cordon inclus"),
            "norme": row.text("norme"),
            "longueur": row.text("longueur"),
            "connecteur": row.text("type de connecteur"),
        }),
        Category::IpTelephony => {
            let description2 = row.text("commentaires 2");
            serde_json::json!({
                "alim": row.text("alim externe"),
                "description2": if description2.is_empty() { row.text("") } else { description2 },
            })
        }
        Category::Software => {
            let description2 = row.text("commentaires 2");
            serde_json::json!({
                "description2": if description2.is_empty() { row.text("") } else { description2 },
            })
        }
    }
}

/// Build the upsert payload for one row, or `None` when the row must be
/// skipped (no SKU, or no resolvable category for an unknown sheet).
fn build_product(
    normalized_sheet: &str,
    row: &SheetRow,
    uploads_dir: &Path,
    upload_base: &str,
) -> Option<NewProduct> {
    let sku = {
        let direct = row.text("sku");
        if direct.is_empty() { row.text("code article") } else { direct }
    };
    if sku.is_empty() {
        warn!(sheet = normalized_sheet, "row skipped: missing SKU");
        return None;
    }

    let (category, specs_value) = match sheet_category(normalized_sheet) {
        Some(category) => (category, extract_specs(category, row)),
        None => {
            // Unknown sheet: the row's own label, else the sheet name,
            // must still name a known category.
            let label = {
                let from_row = row.text("role");
                if from_row.is_empty() { normalized_sheet.to_owned() } else { from_row }
            };
            match Category::from_label(&label) {
                Some(category) => (category, serde_json::json!({})),
                None => {
                    warn!(sheet = normalized_sheet, sku, label, "row skipped: unknown category");
                    return None;
                }
            }
        }
    };

    let specs = match ProductSpecs::from_value(category, specs_value) {
        Ok(specs) => specs,
        Err(err) => {
            warn!(sheet = normalized_sheet, sku, error = %err, "row skipped: bad attribute bag");
            return None;
        }
    };

    // Tier-2 and tier-3 prices are rounded to whole euros; tier-1 and
    // the cost price keep their cents.
    let pricet2 = row.price("prix de vente €ht t2 -2,5%").map(round_half_up);
    let pricet3 = row.price("prix de vente €ht t3 -5,0%").map(round_half_up);

    let guarantee = {
        let g = row.text("garantie");
        if g.is_empty() { "1 an".to_owned() } else { g }
    };

    Some(NewProduct {
        gn: row.text("gn ou hg").to_uppercase() == "GN",
        sku: sku.clone(),
        name: row.text("reference"),
        brand: row.text("marque"),
        kind: row.text("type"),
        model: row.text("model"),
        description: row.text("commentaires 1"),
        description2: row.text("commentaires 2"),
        price: row.price("pa €ht"),
        pricet1: row.price("prix de vente €ht t1"),
        pricet2,
        pricet3,
        category,
        image: resolve_image_url(uploads_dir, upload_base, &sku),
        guarantee,
        specs,
    })
}

/// Imports workbook sheets into the product table.
pub struct SheetImporter<'a> {
    pool: &'a PgPool,
    workbook_path: PathBuf,
    uploads_dir: PathBuf,
    upload_base: String,
}

impl<'a> SheetImporter<'a> {
    #[must_use]
    pub fn new(pool: &'a PgPool, config: &ServerConfig) -> Self {
        Self {
            pool,
            workbook_path: config.workbook_path.clone(),
            uploads_dir: config.uploads_dir.clone(),
            upload_base: format!("{}/uploads", config.base_url.trim_end_matches('/')),
        }
    }

    /// Import a single sheet by its workbook name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the workbook or sheet is unreadable,
    /// or an upsert fails. Row-level problems are logged and counted as
    /// skips instead.
    #[instrument(skip(self))]
    pub async fn import_sheet(&self, sheet_name: &str) -> Result<SheetReport, ImportError> {
        let mut workbook: Xlsx<_> = open_workbook(&self.workbook_path)?;
        let range = workbook.worksheet_range(sheet_name)?;

        let normalized_sheet = normalize_header(sheet_name);
        info!(sheet = sheet_name, normalized = %normalized_sheet, "importing sheet");

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|header_row| {
                header_row
                    .iter()
                    .map(|cell| normalize_header(&cell.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let repo = ProductRepository::new(self.pool);
        let mut report = SheetReport {
            sheet: sheet_name.to_owned(),
            imported: 0,
            skipped: 0,
        };

        for cells in rows {
            let row = SheetRow::new(&headers, cells);
            match build_product(&normalized_sheet, &row, &self.uploads_dir, &self.upload_base) {
                Some(product) => {
                    repo.upsert_by_sku(&product).await?;
                    report.imported += 1;
                }
                None => report.skipped += 1,
            }
        }

        info!(
            sheet = sheet_name,
            imported = report.imported,
            skipped = report.skipped,
            "sheet import finished"
        );
        Ok(report)
    }

    /// Import every sheet in [`SHEETS`].
    ///
    /// A sheet failure is logged and recorded; remaining sheets still
    /// run. Not transactional: each row upsert is independently
    /// idempotent and safe to re-run.
    pub async fn import_all(&self) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for sheet in SHEETS {
            match self.import_sheet(sheet).await {
                Ok(report) => summary.reports.push(report),
                Err(err) => {
                    tracing::error!(sheet, error = %err, "sheet import failed");
                    summary.failed_sheets.push(sheet.to_owned());
                }
            }
        }

        info!(
            imported = summary.imported(),
            skipped = summary.skipped(),
            failed_sheets = summary.failed_sheets.len(),
            "workbook import finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Data)]) -> SheetRow {
        let headers: Vec<String> = pairs.iter().map(|(h, _)| normalize_header(h)).collect();
        let cells: Vec<Data> = pairs.iter().map(|(_, c)| c.clone()).collect();
        SheetRow::new(&headers, &cells)
    }

    #[test]
    fn test_pc_row_maps_to_computers() {
        let row = row(&[
            ("Code Article", Data::String("PC001".to_owned())),
            ("Référence", Data::String("Latitude  5430".to_owned())),
            ("Marque", Data::String("Dell".to_owned())),
            ("Prix de vente €HT T2 -2,5%", Data::String("45.6".to_owned())),
            ("Processeur", Data::String("i5-1235U".to_owned())),
        ]);

        let product = build_product("pc", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");

        assert_eq!(product.sku, "PC001");
        assert_eq!(product.category, Category::Computers);
        assert_eq!(product.name, "Latitude 5430");
        assert_eq!(product.pricet2, Some(46.0));
        assert_eq!(product.image, "https://cdn.example/uploads/pc001.jpg");
        assert_eq!(product.guarantee, "1 an");

        let specs = product.specs.to_value();
        assert_eq!(specs["cpu"], "i5-1235U");
        assert_eq!(specs["ram"], "");
    }

    #[test]
    fn test_tier_rounding_asymmetry() {
        let row = row(&[
            ("sku", Data::String("NAS10".to_owned())),
            ("PA €HT", Data::Float(12.487)),
            ("Prix de vente €HT T1", Data::Float(12.487)),
            ("Prix de vente €HT T2 -2,5%", Data::Float(12.487)),
            ("Prix de vente €HT T3 -5,0%", Data::Float(12.487)),
        ]);

        let product = build_product("reseaux- nas", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");

        assert_eq!(product.price, Some(12.487));
        assert_eq!(product.pricet1, Some(12.487));
        assert_eq!(product.pricet2, Some(12.0));
        assert_eq!(product.pricet3, Some(12.0));
    }

    #[test]
    fn test_unparseable_price_is_absent() {
        let row = row(&[
            ("sku", Data::String("ACC07".to_owned())),
            ("Prix de vente €HT T1", Data::String("sur devis".to_owned())),
        ]);

        let product = build_product("accessoires", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");

        assert_eq!(product.pricet1, None);
    }

    #[test]
    fn test_missing_sku_skips_row() {
        let row = row(&[("Référence", Data::String("Sans code".to_owned()))]);
        assert!(build_product("pc", &row, Path::new("/nonexistent"), "https://cdn.example/uploads").is_none());
    }

    #[test]
    fn test_network_specs_defaults() {
        let row = row(&[
            ("sku", Data::String("SW24".to_owned())),
            ("Nombre de ports/ baies", Data::Int(24)),
        ]);

        let product = build_product("reseaux- nas", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");

        let specs = product.specs.to_value();
        assert_eq!(specs["racks"], "24");
        assert_eq!(specs["poe"], "non");
        assert_eq!(specs["poePower"], "0 W");
        assert_eq!(specs["alim"], "non");
    }

    #[test]
    fn test_unknown_sheet_uses_row_label() {
        let row = row(&[
            ("sku", Data::String("X1".to_owned())),
            ("role", Data::String("ordinateurs".to_owned())),
        ]);

        let product = build_product("divers", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");
        assert_eq!(product.category, Category::Computers);
    }

    #[test]
    fn test_unknown_sheet_without_label_skips_row() {
        let row = row(&[("sku", Data::String("X1".to_owned()))]);
        assert!(build_product("divers", &row, Path::new("/nonexistent"), "https://cdn.example/uploads").is_none());
    }

    #[test]
    fn test_gn_flag() {
        let row = row(&[
            ("sku", Data::String("PC002".to_owned())),
            ("GN ou HG", Data::String("gn".to_owned())),
        ]);

        let product = build_product("pc", &row, Path::new("/nonexistent"), "https://cdn.example/uploads")
            .expect("row imports");
        assert!(product.gn);
    }
}
