//! Loads a skinned glTF model, plays its first clip for a few frames and
//! prints the resulting bone palette.
//!
//! ```text
//! RUST_LOG=debug cargo run --example palette_dump -- path/to/model.glb [clip] [frames]
//! ```

use std::sync::Arc;

use anyhow::Context;
use ossein::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: palette_dump <model> [clip] [frames]")?;
    let clip: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0);
    let frames: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(30);

    let mut model = Model::load(&path).with_context(|| format!("loading {path}"))?;
    let animation = Arc::new(model.load_animation(clip)?);
    println!(
        "{}: clip '{}' {:.2} ticks @ {} tps, {} bones",
        path,
        animation.name(),
        animation.duration(),
        animation.ticks_per_second(),
        animation.bone_count()
    );

    let mut animator = Animator::with_animation(animation, AnimatorSettings::default());
    for _ in 0..frames {
        animator.update_animation(FRAME_TIME);
    }

    println!("t = {:.3} ticks", animator.current_time());
    let mut bones: Vec<_> = model.bone_registry().iter().collect();
    bones.sort_by_key(|(_, info)| info.id);
    let palette = animator.final_bone_matrices();
    for (name, info) in bones {
        let (_, _, translation) = palette[info.id].to_scale_rotation_translation();
        println!("{:>3} {name:<32} {translation:?}", info.id);
    }
    Ok(())
}
