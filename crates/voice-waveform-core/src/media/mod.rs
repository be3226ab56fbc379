mod audio_converter;
mod stage_error;
mod waveform_sampler;

pub use {
    audio_converter::AudioConverter, stage_error::StageError, waveform_sampler::WaveformSampler,
};
