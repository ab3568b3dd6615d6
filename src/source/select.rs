// source/select.rs — 随机挑选一张壁纸

use super::WallpaperMetadata;
use rand::Rng;
use rand::seq::SliceRandom;

/// 从候选列表中等概率随机挑选一张
///
/// 随机数生成器由调用方传入：程序里用 `thread_rng()`，测试里用固定种子的 `StdRng`。
/// 列表为空时返回 None，由调用方决定如何提示。
pub fn select_random<'a, R>(items: &'a [WallpaperMetadata], rng: &mut R) -> Option<&'a WallpaperMetadata>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn items(ids: &[&str]) -> Vec<WallpaperMetadata> {
        ids.iter()
            .map(|id| WallpaperMetadata {
                id: id.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn empty_list_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_random(&[], &mut rng).is_none());
    }

    #[test]
    fn same_seed_same_choice() {
        let list = items(&["a", "b", "c", "d", "e"]);
        let first = select_random(&list, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = select_random(&list, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_item_can_be_selected() {
        let list = items(&["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];

        for _ in 0..300 {
            let chosen = select_random(&list, &mut rng).unwrap();
            let index = list.iter().position(|w| w == chosen).unwrap();
            seen[index] = true;
        }

        assert_eq!(seen, [true; 3]);
    }
}
