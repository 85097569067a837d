//! 题目列表分页
//!
//! 纯函数，不了解存储层。越界页返回空，不回退到最后一页。

/// 每页题目数（固定，不接受客户端配置）
pub const QUESTIONS_PER_PAGE: usize = 10;

/// 未提供页码时的默认页
pub const DEFAULT_PAGE: u32 = 1;

/// 取第 `page` 页（从 1 开始）的切片 `[(page-1)*size, page*size)`
///
/// `page == 0`、`page_size == 0` 或越界时返回空。
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: usize) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }

    let start = (page as usize - 1).saturating_mul(page_size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// 从 URL 查询串解析 `page`
///
/// 缺失或不是整数时回退到 `DEFAULT_PAGE`；负数同样视为无效。
pub fn page_from_query(query: Option<&str>) -> u32 {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value.into_owned())
        })
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_first_page() {
        let page = paginate(&items(25), 1, QUESTIONS_PER_PAGE);
        assert_eq!(page, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate(&items(25), 3, QUESTIONS_PER_PAGE);
        assert_eq!(page, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_clamped() {
        assert!(paginate(&items(25), 4, QUESTIONS_PER_PAGE).is_empty());
        assert!(paginate(&items(20), 3, QUESTIONS_PER_PAGE).is_empty());
        assert!(paginate(&items(5), u32::MAX, QUESTIONS_PER_PAGE).is_empty());
    }

    #[test]
    fn test_page_zero_is_empty() {
        assert!(paginate(&items(25), 0, QUESTIONS_PER_PAGE).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<usize> = Vec::new();
        assert!(paginate(&empty, 1, QUESTIONS_PER_PAGE).is_empty());
    }

    #[test]
    fn test_pages_are_bounded_contiguous_and_disjoint() {
        let all = items(47);
        let mut seen = Vec::new();
        for page in 1..=6u32 {
            let current = paginate(&all, page, QUESTIONS_PER_PAGE);
            let next = paginate(&all, page + 1, QUESTIONS_PER_PAGE);

            assert!(current.len() <= QUESTIONS_PER_PAGE);
            assert!(current.windows(2).all(|w| w[1] == w[0] + 1));
            assert!(current.iter().all(|x| !next.contains(x)));
            seen.extend(current);
        }
        assert_eq!(seen, all);
    }

    #[test]
    fn test_page_from_query() {
        assert_eq!(page_from_query(None), 1);
        assert_eq!(page_from_query(Some("")), 1);
        assert_eq!(page_from_query(Some("page=3")), 3);
        assert_eq!(page_from_query(Some("foo=bar&page=2")), 2);
        assert_eq!(page_from_query(Some("page=abc")), 1);
        assert_eq!(page_from_query(Some("page=-1")), 1);
        assert_eq!(page_from_query(Some("page=0")), 0);
    }
}
