//! Storage initialization
//!
//! Handles first-run setup and holds the starter catalogue of categories and
//! brands loaded by the seed operation.

use crate::config::paths::BizdeskPaths;
use crate::config::settings::Settings;
use crate::error::BizdeskError;

use super::file_io::write_json_atomic;

/// Starter categories for a mobile-parts shop: `(name, description)`
pub const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Pantallas", "Pantallas para móviles y tablets"),
    ("Baterías", "Baterías para dispositivos móviles"),
    ("Cargadores", "Cargadores y adaptadores"),
    ("Fundas", "Fundas y protectores"),
    ("Auriculares", "Auriculares y audífonos"),
    ("Cables", "Cables y conectores"),
    ("Memorias", "Tarjetas de memoria y USB"),
    ("Accesorios", "Otros accesorios móviles"),
];

/// Starter brands: `(name, description, website)`
pub const SEED_BRANDS: &[(&str, &str, Option<&str>)] = &[
    ("Samsung", "Electrónica y móviles Samsung", Some("https://www.samsung.com")),
    ("Xiaomi", "Dispositivos móviles Xiaomi", Some("https://www.mi.com")),
    ("Huawei", "Tecnología Huawei", Some("https://www.huawei.com")),
    ("Apple", "Productos Apple", Some("https://www.apple.com")),
    ("OPPO", "Móviles OPPO", Some("https://www.oppo.com")),
    ("Vivo", "Dispositivos Vivo", Some("https://www.vivo.com")),
    ("Realme", "Móviles Realme", Some("https://www.realme.com")),
    ("OnePlus", "Móviles OnePlus", Some("https://www.oneplus.com")),
    ("Motorola", "Dispositivos Motorola", Some("https://www.motorola.com")),
    ("LG", "Electrónica LG", Some("https://www.lg.com")),
    ("Sony", "Electrónica Sony", Some("https://www.sony.com")),
    ("Nokia", "Móviles Nokia", Some("https://www.nokia.com")),
    ("Lenovo", "Tecnología Lenovo", Some("https://www.lenovo.com")),
    ("ASUS", "Electrónica ASUS", Some("https://www.asus.com")),
    ("Generic", "Productos genéricos sin marca", None),
];

/// Initialize storage for a fresh installation
///
/// Creates the directory layout, a default settings file and an empty file
/// for every collection. Existing files are left untouched.
pub fn initialize_storage(paths: &BizdeskPaths) -> Result<(), BizdeskError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    let empty = serde_json::json!({ "items": [] });
    for file in [
        paths.businesses_file(),
        paths.products_file(),
        paths.categories_file(),
        paths.brands_file(),
        paths.incomes_file(),
        paths.expenses_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &empty)?;
        }
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BizdeskPaths) -> bool {
    !paths.is_initialized()
}
