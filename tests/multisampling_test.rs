use rotating_shapes::context::{MSAA_SAMPLES, msaa_sample_count};
use wgpu::TextureFormatFeatureFlags as Flags;

#[test]
fn should_antialias_when_both_targets_support_it() {
    let supported = Flags::FILTERABLE | Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE;

    assert_eq!(MSAA_SAMPLES, 4);
    assert_eq!(msaa_sample_count(supported, Flags::MULTISAMPLE_X4), 4);
}

#[test]
fn should_fall_back_to_single_sampling() {
    assert_eq!(msaa_sample_count(Flags::empty(), Flags::MULTISAMPLE_X4), 1);
    assert_eq!(msaa_sample_count(Flags::MULTISAMPLE_X4, Flags::MULTISAMPLE_X2), 1);
    assert_eq!(msaa_sample_count(Flags::empty(), Flags::empty()), 1);
}
