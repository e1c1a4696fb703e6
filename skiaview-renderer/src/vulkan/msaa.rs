use ash::vk;

// Below this multisampling isn't worth an extra offscreen surface
const MIN_SAMPLE_COUNT: u32 = 4;

/// Picks the largest sample count from `max_sample_count` halving down to 4 that appears in
/// `supported`. Returns 1 (no multisampling) if none of them does.
pub fn choose_sample_count(
    supported: &[u32],
    max_sample_count: u32,
) -> u32 {
    let mut sample_count = max_sample_count.next_power_of_two().min(64);
    if sample_count > max_sample_count {
        sample_count /= 2;
    }

    while sample_count >= MIN_SAMPLE_COUNT {
        if supported.contains(&sample_count) {
            return sample_count;
        }
        sample_count /= 2;
    }

    1
}

/// Lists the sample counts set in `flags`, smallest first
pub(super) fn sample_counts_from_flags(flags: vk::SampleCountFlags) -> Vec<u32> {
    [
        (vk::SampleCountFlags::TYPE_1, 1),
        (vk::SampleCountFlags::TYPE_2, 2),
        (vk::SampleCountFlags::TYPE_4, 4),
        (vk::SampleCountFlags::TYPE_8, 8),
        (vk::SampleCountFlags::TYPE_16, 16),
        (vk::SampleCountFlags::TYPE_32, 32),
        (vk::SampleCountFlags::TYPE_64, 64),
    ]
    .iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, count)| *count)
    .collect()
}
