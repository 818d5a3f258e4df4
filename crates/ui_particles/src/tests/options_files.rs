use crate::config::{Config, ConfigError};
use crate::core::options::{MaterialRemap, WidgetRenderOptions};
use crate::simulation::material::MaterialId;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    fn tuned_options() -> WidgetRenderOptions {
        let mut remap = MaterialRemap::new().with(MaterialId(11), MaterialId(21));
        remap.insert(MaterialId(12), None);

        WidgetRenderOptions {
            auto_activate: false,
            show_debug_in_world: true,
            disable_warnings: true,
            ..WidgetRenderOptions::default()
        }
        .with_fake_depth(640.0)
        .with_ribbon_dynamic_params_as_uv1(true)
        .with_material_remap(remap)
    }

    #[test]
    fn test_options_survive_toml_and_ron_files() {
        let dir = TempDir::new().expect("temp dir");
        let options = tuned_options();

        for name in ["widget.toml", "widget.ron"] {
            let path = dir.path().join(name);
            options.save_to_file(&path).expect("save");
            let loaded = WidgetRenderOptions::load_from_file(&path).expect("load");
            assert_eq!(loaded, options, "{}", name);
            assert!(loaded.material_remap.contains(MaterialId(12)));
        }
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let result = WidgetRenderOptions::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("widget.yaml");
        assert!(matches!(
            WidgetRenderOptions::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_distance_in_file_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "fake_depth_scale = true\nfake_depth_distance = 0.0\n").expect("write");
        assert!(matches!(
            WidgetRenderOptions::load_from_file(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
