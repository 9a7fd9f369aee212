//! Pipeline orchestration.
//!
//! Sequences the relocation passes, the sprite slicer, the model reference
//! rewriter and the descriptor update over a working directory, streaming
//! timestamped log lines and progress fractions to an [`Observer`] and
//! flushing the accumulated log into a changelog inside the pack tree.
//!
//! The pipeline is stateless between invocations: every run takes its
//! working directory and options explicitly, and the working directory is
//! treated as exclusively owned for the duration of the run.

use std::path::{Path, PathBuf};

use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::Result;
use crate::slicer::SliceSpec;
use crate::{mcmeta, models, relocate, slicer, APP_NAME, CHANGELOG_NAME};

/// Sink for run notifications.
///
/// Notifications are fire-and-forget and arrive in the order operations
/// complete; both methods default to no-ops so hosts can implement only
/// what they render.
pub trait Observer {
    /// A timestamped log line was appended to the run log.
    fn log(&mut self, _line: &str) {}

    /// Overall progress in `[0.0, 1.0]`.
    fn progress(&mut self, _fraction: f32) {}
}

/// Observer that discards everything.
pub struct NullObserver;

impl Observer for NullObserver {}

/// Accumulates the run log and the progress counter, forwarding both to
/// the host observer as they happen.
pub struct Reporter<'a> {
    observer: &'a mut dyn Observer,
    lines: Vec<String>,
    step: usize,
    total: usize,
}

impl<'a> Reporter<'a> {
    pub fn new(observer: &'a mut dyn Observer, total_steps: usize) -> Self {
        Self {
            observer,
            lines: Vec::new(),
            step: 0,
            total: total_steps.max(1),
        }
    }

    /// Append a timestamped line to the run log.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let line = format!("{} — {}", now_str(), message.as_ref());
        self.observer.log(&line);
        self.lines.push(line);
    }

    /// Advance progress by one step.
    pub fn tick(&mut self) {
        self.step += 1;
        let fraction = (self.step as f32 / self.total as f32).min(1.0);
        self.observer.progress(fraction);
    }

    /// All log lines recorded so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn finish(&mut self) {
        self.observer.progress(1.0);
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Current local time (UTC when no local offset is available) as
/// `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn now_str() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format)
        .unwrap_or_else(|_| String::from("unknown time"))
}

/// Options for a pipeline run.
pub struct UpdateOptions {
    /// Remove sources after relocation instead of leaving copies behind.
    pub replace_originals: bool,
    /// Sprite-slicing mapping; an empty mapping disables the slicing stage.
    pub slices: SliceSpec,
}

/// What a completed run did, plus the full log.
pub struct RunSummary {
    pub log_lines: Vec<String>,
    pub dirs_created: usize,
    pub armor_moved: usize,
    pub trims_moved: usize,
    pub sprites_written: usize,
    pub model_refs_updated: usize,
    pub changelog: PathBuf,
}

/// Directories every current-layout pack is expected to carry.
const SKELETON_DIRS: &[&str] = &[
    "atlases",
    "blockstates",
    "equipment",
    "font/include",
    "items",
    "lang",
    "models/block",
    "models/item",
    "particles",
    "post_effect",
    "shaders/core",
    "shaders/include",
    "shaders/post",
    "texts",
    "textures/block",
    "textures/colormap",
    "textures/effect",
    "textures/entity",
    "textures/font",
    "textures/gui/sprites",
    "textures/item",
    "textures/map",
    "textures/misc",
    "textures/mob_effect",
    "textures/painting",
    "textures/particle",
    "textures/trims/entity/humanoid",
    "textures/trims/entity/humanoid_leggings",
    "textures/waypoint_style",
];

/// Create the current-layout directory skeleton under the working
/// directory, returning the directories that were actually created.
pub fn ensure_skeleton(workdir: &Path) -> Result<Vec<PathBuf>> {
    let base = workdir.join("assets").join("minecraft");
    let mut created = Vec::new();
    for dir in SKELETON_DIRS {
        let path = dir.split('/').fold(base.clone(), |p, seg| p.join(seg));
        if !path.is_dir() {
            std::fs::create_dir_all(&path)?;
            created.push(path);
        }
    }
    Ok(created)
}

/// Run the full update pipeline over a working directory.
///
/// The working directory is mutated in place; callers own making it a
/// scratch copy. Per-item failures inside the stages degrade to log lines;
/// only an uncreatable skeleton or an unwritable changelog abort the run.
pub fn run_update(
    workdir: &Path,
    options: &UpdateOptions,
    observer: &mut dyn Observer,
) -> Result<RunSummary> {
    // One tick per mapped sprite plus fixed headroom for the walk-driven
    // passes, whose file counts are unknown up front.
    let total_steps = 5 + options.slices.output_count() + 30;
    let mut reporter = Reporter::new(observer, total_steps);

    reporter.log(format!("Starting update in {}", workdir.display()));

    let created = ensure_skeleton(workdir)?;
    for dir in &created {
        reporter.log(format!("Created dir: {}", dir.display()));
    }

    let copy_only = !options.replace_originals;

    reporter.log("Processing armor textures...");
    let armor_moved = relocate::relocate_armor(workdir, copy_only, &mut reporter);
    reporter.log(format!("Armor/equipment textures processed: {}", armor_moved));

    reporter.log("Processing trims...");
    let trims_moved = relocate::relocate_trims(workdir, copy_only, &mut reporter);
    reporter.log(format!("Trim textures processed: {}", trims_moved));

    let sprites_written = if options.slices.is_empty() {
        reporter.log("No slicer mapping loaded — skipping sprite slicing.");
        for _ in 0..5 {
            reporter.tick();
        }
        0
    } else {
        reporter.log(format!(
            "Applying slicer mappings ({} outputs)...",
            options.slices.output_count()
        ));
        let written = slicer::apply_slices(workdir, &options.slices, &mut reporter);
        reporter.log(format!("GUI sprites created: {}", written));
        written
    };

    reporter.log("Updating model JSON references...");
    let model_refs_updated = models::rewrite_model_refs(workdir, &mut reporter);
    reporter.log(format!("Model JSON refs updated: {}", model_refs_updated));

    mcmeta::update_pack_mcmeta(workdir, &mut reporter);

    let changelog = write_changelog(workdir, reporter.lines())?;
    reporter.log(format!("Wrote changelog: {}", changelog.display()));
    reporter.finish();

    Ok(RunSummary {
        log_lines: reporter.into_lines(),
        dirs_created: created.len(),
        armor_moved,
        trims_moved,
        sprites_written,
        model_refs_updated,
        changelog,
    })
}

/// Flush the run log into the pack tree so it ships with the archive.
fn write_changelog(workdir: &Path, lines: &[String]) -> Result<PathBuf> {
    let path = workdir.join(CHANGELOG_NAME);
    let mut content = format!("{} changelog — {}\n\n", APP_NAME, now_str());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(&path, content).map_err(|e| crate::error::MewError::Io {
        path: path.clone(),
        message: format!("Failed to write changelog: {}", e),
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collecting {
        lines: Vec<String>,
        fractions: Vec<f32>,
    }

    impl Observer for Collecting {
        fn log(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }

        fn progress(&mut self, fraction: f32) {
            self.fractions.push(fraction);
        }
    }

    fn seed_pack(root: &Path) {
        let textures = root.join("assets/minecraft/textures");
        std::fs::create_dir_all(textures.join("models/armor")).unwrap();
        std::fs::write(textures.join("models/armor/diamond_layer_1.png"), b"png").unwrap();

        let models = root.join("assets/minecraft/models/item");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::write(
            models.join("helmet.json"),
            r#"{ "textures": { "texture": "gold_layer_1.png" } }"#,
        )
        .unwrap();
    }

    #[test]
    fn test_run_without_slicer_mapping() {
        let dir = tempfile::tempdir().unwrap();
        seed_pack(dir.path());

        let mut observer = Collecting::default();
        let options = UpdateOptions {
            replace_originals: false,
            slices: SliceSpec::new(),
        };
        let summary = run_update(dir.path(), &options, &mut observer).unwrap();

        assert_eq!(summary.armor_moved, 1);
        assert_eq!(summary.model_refs_updated, 1);
        assert_eq!(summary.sprites_written, 0);
        assert!(summary.dirs_created > 0);
        assert!(summary.changelog.is_file());

        let changelog = std::fs::read_to_string(&summary.changelog).unwrap();
        assert!(changelog.contains("skipping sprite slicing"));
        assert!(!changelog.contains("Applying slicer mappings"));
        assert!(changelog.contains("Armor moved/copied:"));
        assert!(changelog.contains("Updated pack.mcmeta"));

        // The descriptor was created even though the pack had none.
        assert!(dir.path().join("pack.mcmeta").is_file());
    }

    #[test]
    fn test_run_with_slicer_mapping() {
        let dir = tempfile::tempdir().unwrap();
        seed_pack(dir.path());

        let atlas = dir.path().join("gui/widgets.png");
        std::fs::create_dir_all(atlas.parent().unwrap()).unwrap();
        image::RgbaImage::from_pixel(200, 200, image::Rgba([1, 2, 3, 255]))
            .save(&atlas)
            .unwrap();

        let slices = crate::slicer::parse_slicer(
            r#"
input("gui/widgets.png",
    new OutputFile("gui/sprites/button.png", new Box(0, 0, 20, 20, 200, 200)),
)
"#,
        );

        let mut observer = NullObserver;
        let options = UpdateOptions {
            replace_originals: false,
            slices,
        };
        let summary = run_update(dir.path(), &options, &mut observer).unwrap();

        assert_eq!(summary.sprites_written, 1);
        assert!(dir.path().join("gui/sprites/button.png").is_file());
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        seed_pack(dir.path());

        let mut observer = Collecting::default();
        let options = UpdateOptions {
            replace_originals: false,
            slices: SliceSpec::new(),
        };
        run_update(dir.path(), &options, &mut observer).unwrap();

        assert!(!observer.fractions.is_empty());
        for pair in observer.fractions.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(observer.fractions.iter().all(|f| *f <= 1.0));
        assert_eq!(*observer.fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_skeleton_is_created_once() {
        let dir = tempfile::tempdir().unwrap();

        let created = ensure_skeleton(dir.path()).unwrap();
        assert!(!created.is_empty());
        assert!(dir
            .path()
            .join("assets/minecraft/textures/gui/sprites")
            .is_dir());

        // Second call finds everything in place.
        assert!(ensure_skeleton(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_observer_receives_log_lines() {
        let dir = tempfile::tempdir().unwrap();

        let mut observer = Collecting::default();
        let options = UpdateOptions {
            replace_originals: false,
            slices: SliceSpec::new(),
        };
        let summary = run_update(dir.path(), &options, &mut observer).unwrap();

        // Every line in the summary log reached the observer as it happened.
        assert_eq!(observer.lines, summary.log_lines);
        assert!(observer.lines[0].contains("Starting update in"));
    }
}
