//! Advisory checks for hosting tools
//!
//! Configuration problems never stop rendering; the offending renderer just
//! draws nothing. These checks let an editor tell the user why.

use crate::core::options::{MaterialRemap, WidgetRenderOptions};
use crate::simulation::emitter::{EmitterInstance, SimTarget};
use crate::simulation::material::{MaterialId, MaterialLibrary};
use crate::simulation::renderer::RendererProperties;
use std::collections::BTreeSet;
use std::fmt;

/// A non-fatal configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The emitter simulates on the GPU and is never drawn
    GpuEmitter {
        /// Emitter name
        emitter: String,
    },
    /// A renderer draws with a material outside the UI domain
    NonUiMaterial {
        /// Emitter name
        emitter: String,
        /// Renderer name
        renderer: String,
        /// Material actually used, after remapping
        material: MaterialId,
        /// Whether `material` came from the remap table
        remapped: bool,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpuEmitter { emitter } => write!(
                f,
                "Emitter '{}' uses the GPU sim target; only CPU emitters are rendered",
                emitter
            ),
            Self::NonUiMaterial {
                emitter,
                renderer,
                material,
                remapped,
            } => {
                write!(
                    f,
                    "Renderer '{}' of emitter '{}' uses {} which is not a UI material",
                    renderer, emitter, material
                )?;
                if *remapped {
                    f.write_str(" (set by the remap table)")
                } else {
                    f.write_str("; remap it to a UI material")
                }
            }
        }
    }
}

fn renderer_material(renderer: &RendererProperties) -> Option<MaterialId> {
    match renderer {
        RendererProperties::Sprite(_) | RendererProperties::Ribbon(_) => renderer.material(),
        RendererProperties::Other(_) => None,
    }
}

/// Renderer materials that resolve to a known non-UI material.
///
/// Yields `(emitter, renderer, original, resolved)`.
fn non_ui_materials<'a>(
    emitters: &'a [EmitterInstance],
    remap: &'a MaterialRemap,
    library: &'a MaterialLibrary,
) -> impl Iterator<Item = (&'a EmitterInstance, &'a RendererProperties, MaterialId, MaterialId)> + 'a {
    emitters
        .iter()
        .filter(|emitter| emitter.sim_target == SimTarget::Cpu)
        .flat_map(|emitter| emitter.renderers.iter().map(move |renderer| (emitter, renderer)))
        .filter_map(move |(emitter, renderer)| {
            let original = renderer_material(renderer)?;
            let resolved = remap.resolve(original);
            let material = library.get(resolved)?;
            (!material.is_ui_compatible()).then_some((emitter, renderer, original, resolved))
        })
}

/// Advisories for a widget's emitters; empty when warnings are disabled
pub fn check_widget(
    emitters: &[EmitterInstance],
    options: &WidgetRenderOptions,
    library: &MaterialLibrary,
) -> Vec<Advisory> {
    if options.disable_warnings {
        return Vec::new();
    }

    let mut advisories: Vec<Advisory> = emitters
        .iter()
        .filter(|emitter| emitter.sim_target == SimTarget::Gpu)
        .map(|emitter| Advisory::GpuEmitter {
            emitter: emitter.name.clone(),
        })
        .collect();

    advisories.extend(
        non_ui_materials(emitters, &options.material_remap, library).map(
            |(emitter, renderer, original, resolved)| Advisory::NonUiMaterial {
                emitter: emitter.name.clone(),
                renderer: renderer.name().to_string(),
                material: resolved,
                remapped: original != resolved,
            },
        ),
    );

    for advisory in &advisories {
        log::debug!("{}", advisory);
    }
    advisories
}

/// Non-UI materials that have no remap entry yet, ascending and deduplicated
pub fn suggest_remap_entries(
    emitters: &[EmitterInstance],
    options: &WidgetRenderOptions,
    library: &MaterialLibrary,
) -> Vec<MaterialId> {
    let remap = &options.material_remap;
    non_ui_materials(emitters, remap, library)
        .map(|(_, _, original, _)| original)
        .filter(|original| !remap.contains(*original))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Add placeholder entries for `suggestions`; returns how many were new
pub fn apply_suggestions(remap: &mut MaterialRemap, suggestions: &[MaterialId]) -> usize {
    let mut added = 0;
    for &material in suggestions {
        if !remap.contains(material) {
            remap.insert(material, None);
            added += 1;
        }
    }
    added
}
