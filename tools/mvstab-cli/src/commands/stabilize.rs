//! Run the stabilizer over a field sequence file.

use std::path::PathBuf;

use mvstab_common::config::StabilizerDefaults;
use mvstab_core::TemporalStabilizer;
use mvstab_field_model::FieldSequence;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    reset_every: usize,
    defaults: &StabilizerDefaults,
) -> anyhow::Result<()> {
    println!("Stabilizing: {}", input.display());

    let sequence = super::load_sequence(&input)?;
    let fields = sequence.fields()?;
    println!(
        "  {} frames at {}x{}",
        fields.len(),
        sequence.width,
        sequence.height
    );

    let mut stab = TemporalStabilizer::new(defaults.to_params());
    stab.set_enabled(defaults.enabled);
    let mut stabilized = FieldSequence::new(sequence.width, sequence.height);

    for (index, field) in fields.iter().enumerate() {
        if reset_every > 0 && index > 0 && index % reset_every == 0 {
            tracing::debug!(frame = index, "Periodic history reset");
            stab.reset();
        }
        let out = stab.process(field);
        stabilized.push(out)?;

        if let Some(stats) = stab.last_stats() {
            tracing::info!(
                frame = index,
                blended = stats.blended,
                discarded = stats.discarded,
                passthrough = stats.passthrough,
                "Frame stabilized"
            );
        }
    }

    let output = output.unwrap_or_else(|| input.with_extension("stable.json"));
    super::write_sequence(&output, &stabilized)?;
    println!("  Output written to: {}", output.display());

    Ok(())
}
