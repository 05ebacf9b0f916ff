//! Integer flex distribution.
//!
//! Terminal cells are indivisible, so shares are computed with cumulative
//! flooring: item `k` receives `floor(free * F_k / F) - floor(free * F_{k-1} / F)`
//! where `F_k` is the running factor sum. The shares always add up to exactly
//! `free`, and the last flexible item absorbs the rounding remainder.
//!
//! Items that would cross their min/max are frozen at the limit and the rest
//! of the space is redistributed among the others.

use crate::types::JustifyContent;

/// One item along the main axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    /// Hypothetical main size (basis clamped to min/max).
    pub base: u16,
    pub grow: f32,
    pub shrink: f32,
    pub min: u16,
    pub max: u16,
    /// Margins along the main axis. Fixed; never flexed.
    pub margin: u16,
}

impl FlexItem {
    pub fn fixed(size: u16) -> Self {
        Self {
            base: size,
            grow: 0.0,
            shrink: 0.0,
            min: 0,
            max: u16::MAX,
            margin: 0,
        }
    }
}

/// Split `amount` among `weights` with cumulative flooring.
fn cumulative_shares(weights: &[f64], amount: u32) -> Vec<u32> {
    let total: f64 = weights.iter().sum();
    let mut shares = Vec::with_capacity(weights.len());
    if weights.is_empty() || total <= 0.0 || !total.is_finite() {
        shares.resize(weights.len(), 0);
        return shares;
    }

    let mut acc = 0.0;
    let mut prev: u32 = 0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        let cum = if i + 1 == weights.len() {
            amount
        } else {
            ((amount as f64 * acc / total).floor() as u32).min(amount)
        };
        let cum = cum.max(prev);
        shares.push(cum - prev);
        prev = cum;
    }
    shares
}

fn sanitize(factor: f32) -> f64 {
    if factor.is_finite() && factor > 0.0 {
        factor as f64
    } else {
        0.0
    }
}

/// Grow `sizes` by `free` cells according to grow factors.
fn grow(items: &[FlexItem], sizes: &mut [u16], free: u32) {
    let mut frozen: Vec<bool> = items
        .iter()
        .zip(sizes.iter())
        .map(|(item, size)| sanitize(item.grow) == 0.0 || *size >= item.max)
        .collect();
    let mut remaining = free;

    while remaining > 0 {
        let active: Vec<usize> = (0..items.len()).filter(|&i| !frozen[i]).collect();
        if active.is_empty() {
            break;
        }
        let weights: Vec<f64> = active.iter().map(|&i| sanitize(items[i].grow)).collect();
        let shares = cumulative_shares(&weights, remaining);

        let mut violated = false;
        for (&i, &share) in active.iter().zip(&shares) {
            let target = sizes[i] as u32 + share;
            if target > items[i].max as u32 {
                remaining -= (items[i].max - sizes[i]) as u32;
                sizes[i] = items[i].max;
                frozen[i] = true;
                violated = true;
            }
        }
        if violated {
            continue;
        }

        for (&i, &share) in active.iter().zip(&shares) {
            sizes[i] = (sizes[i] as u32 + share).min(u16::MAX as u32) as u16;
        }
        break;
    }
}

/// Shrink `sizes` by `overflow` cells, weighting by `shrink * base`.
fn shrink(items: &[FlexItem], sizes: &mut [u16], overflow: u32) {
    let mut frozen: Vec<bool> = items
        .iter()
        .zip(sizes.iter())
        .map(|(item, size)| sanitize(item.shrink) == 0.0 || *size <= item.min)
        .collect();
    let mut remaining = overflow;

    while remaining > 0 {
        let active: Vec<usize> = (0..items.len()).filter(|&i| !frozen[i]).collect();
        if active.is_empty() {
            break;
        }
        let weights: Vec<f64> = active
            .iter()
            .map(|&i| sanitize(items[i].shrink) * sizes[i] as f64)
            .collect();
        if weights.iter().all(|w| *w == 0.0) {
            break;
        }
        let shares = cumulative_shares(&weights, remaining);

        let mut violated = false;
        for (&i, &share) in active.iter().zip(&shares) {
            let floor = items[i].min as u32;
            if (sizes[i] as u32).saturating_sub(share) < floor || share > sizes[i] as u32 {
                remaining = remaining.saturating_sub(sizes[i] as u32 - floor.min(sizes[i] as u32));
                sizes[i] = items[i].min.min(sizes[i]);
                frozen[i] = true;
                violated = true;
            }
        }
        if violated {
            continue;
        }

        for (&i, &share) in active.iter().zip(&shares) {
            sizes[i] -= share as u16;
        }
        break;
    }
}

/// Resolve final main sizes for `items` placed in `available` cells
/// (the container's main size minus gaps).
///
/// Guarantees:
/// - with free space and a positive grow factor (and no max limits hit), the
///   outer sizes add up to exactly `available`
/// - the outer sizes never add up to more than `available`: when items cannot
///   shrink enough, trailing items are cut
pub fn resolve_flexible_lengths(items: &[FlexItem], available: u16) -> Vec<u16> {
    let mut sizes: Vec<u16> = items.iter().map(|item| item.base).collect();
    let used: u32 = items.iter().map(|item| item.base as u32 + item.margin as u32).sum();
    let available_u32 = available as u32;

    if used < available_u32 {
        grow(items, &mut sizes, available_u32 - used);
    } else if used > available_u32 {
        shrink(items, &mut sizes, used - available_u32);
    }

    // Containment: cut from the end until the line fits.
    let mut total: u32 = items
        .iter()
        .zip(&sizes)
        .map(|(item, size)| *size as u32 + item.margin as u32)
        .sum();
    for i in (0..sizes.len()).rev() {
        if total <= available_u32 {
            break;
        }
        let cut = (total - available_u32).min(sizes[i] as u32);
        sizes[i] -= cut as u16;
        total -= cut;
    }

    sizes
}

/// Extra offset before each of `count` items for the given justification,
/// with `free` leftover cells. Offsets are cumulative and never exceed `free`.
pub fn justify_offsets(justify: JustifyContent, free: u16, count: usize) -> Vec<u16> {
    let free = free as u64;
    let n = count as u64;
    (0..n)
        .map(|k| {
            let offset = match justify {
                JustifyContent::FlexStart => 0,
                JustifyContent::FlexEnd => free,
                JustifyContent::Center => free / 2,
                JustifyContent::SpaceBetween => {
                    if n > 1 {
                        free * k / (n - 1)
                    } else {
                        0
                    }
                }
                JustifyContent::SpaceAround => free * (2 * k + 1) / (2 * n),
                JustifyContent::SpaceEvenly => free * (k + 1) / (n + 1),
            };
            offset as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flexible(base: u16, grow: f32) -> FlexItem {
        FlexItem {
            base,
            grow,
            shrink: 1.0,
            min: 0,
            max: u16::MAX,
            margin: 0,
        }
    }

    #[test]
    fn test_fixed_plus_two_growers() {
        let items = [FlexItem::fixed(30), flexible(0, 1.0), flexible(0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 100), vec![30, 35, 35]);
    }

    #[test]
    fn test_weighted_growers() {
        let items = [flexible(0, 1.0), flexible(0, 2.0), flexible(0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 100), vec![25, 50, 25]);
    }

    #[test]
    fn test_remainder_goes_to_last() {
        let items = [flexible(0, 1.0), flexible(0, 1.0), flexible(0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 10), vec![3, 3, 4]);
    }

    #[test]
    fn test_max_freezes_and_redistributes() {
        let mut capped = flexible(0, 1.0);
        capped.max = 10;
        let items = [capped, flexible(0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 100), vec![10, 90]);
    }

    #[test]
    fn test_shrink_weighted_by_base() {
        let items = [flexible(60, 0.0), flexible(20, 0.0)];
        assert_eq!(resolve_flexible_lengths(&items, 40), vec![30, 10]);
    }

    #[test]
    fn test_shrink_respects_min() {
        let mut floored = flexible(50, 0.0);
        floored.min = 45;
        let items = [floored, flexible(50, 0.0)];
        assert_eq!(resolve_flexible_lengths(&items, 60), vec![45, 15]);
    }

    #[test]
    fn test_rigid_items_are_cut_from_the_end() {
        let items = [FlexItem::fixed(30), FlexItem::fixed(30)];
        assert_eq!(resolve_flexible_lengths(&items, 40), vec![30, 10]);
    }

    #[test]
    fn test_margins_count_against_space() {
        let mut a = flexible(0, 1.0);
        a.margin = 4;
        let items = [a, flexible(0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 20), vec![8, 8]);
    }

    #[test]
    fn test_justify_offsets() {
        use JustifyContent::*;
        assert_eq!(justify_offsets(FlexStart, 10, 2), vec![0, 0]);
        assert_eq!(justify_offsets(FlexEnd, 10, 2), vec![10, 10]);
        assert_eq!(justify_offsets(Center, 11, 2), vec![5, 5]);
        assert_eq!(justify_offsets(SpaceBetween, 10, 3), vec![0, 5, 10]);
        assert_eq!(justify_offsets(SpaceAround, 12, 3), vec![2, 6, 10]);
        assert_eq!(justify_offsets(SpaceEvenly, 12, 3), vec![3, 6, 9]);
        assert_eq!(justify_offsets(SpaceBetween, 10, 1), vec![0]);
    }
}
