//! Fetch operations over a [`HeroApi`], with image URLs resolved.
//!
//! These are the fetchers the browser hands to its request caches. Each one
//! returns the backend's data with `image` rewritten for display; summary
//! data is passed through untouched.

use crate::api::{HeroApi, PageRequest};
use crate::error::HeroResult;
use crate::images::{resolve_image, resolve_images, ImageKey};
use crate::model::{Hero, PagedHeroes, SummaryInformation};
use crate::search::{build_search_query, SearchFilters, SearchQuery};

/// One page of heroes. `page` is 1-based and is translated to an offset here.
pub async fn get_heroes_by_page(
    api: &dyn HeroApi,
    page: u32,
    limit: u32,
    category: &str,
) -> HeroResult<PagedHeroes> {
    let request = PageRequest::from_page(page, limit, category);
    let mut paged = api.list_heroes(&request).await?;
    paged.heroes = resolve_images(paged.heroes, api.image_base_url(), ImageKey::FilenameStem);
    Ok(paged)
}

/// A single hero by id or slug.
pub async fn get_hero(api: &dyn HeroApi, id_or_slug: &str) -> HeroResult<Hero> {
    let hero = api.get_hero(id_or_slug).await?;
    Ok(resolve_image(hero, api.image_base_url(), ImageKey::Id))
}

/// Search with optional filters. No filters means no request and no results.
pub async fn search_heroes(api: &dyn HeroApi, filters: &SearchFilters) -> HeroResult<Vec<Hero>> {
    match build_search_query(filters) {
        SearchQuery::NoOp => {
            tracing::debug!("empty search, skipping request");
            Ok(Vec::new())
        }
        SearchQuery::Params(pairs) => {
            let heroes = api.search_heroes(&pairs).await?;
            Ok(resolve_images(heroes, api.image_base_url(), ImageKey::Id))
        }
    }
}

/// Aggregate statistics. Embedded heroes keep their raw image filenames.
pub async fn get_summary(api: &dyn HeroApi) -> HeroResult<SummaryInformation> {
    api.summary().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockHeroApi, RecordedRequest};
    use crate::error::HeroError;

    const BASE: &str = "http://localhost:3000";

    fn api() -> MockHeroApi {
        MockHeroApi::new(BASE).with_heroes(vec![
            Hero::new("1", "Clark Kent").with_slug("clark-kent").with_image("1.jpg"),
            Hero::new("2", "Bruce Wayne").with_slug("bruce-wayne").with_image("2.jpg"),
        ])
    }

    #[tokio::test]
    async fn page_results_get_absolute_images() {
        let api = api();
        let paged = get_heroes_by_page(&api, 1, 5, "all").await.unwrap();
        assert_eq!(paged.heroes[0].image, "http://localhost:3000/images/1.jpeg");
        let expected = PageRequest { offset: 0, limit: 5, category: "all".into() };
        assert_eq!(api.history(), vec![RecordedRequest::List(expected)]);
    }

    #[tokio::test]
    async fn second_page_sends_offset() {
        let api = api();
        get_heroes_by_page(&api, 2, 5, "all").await.unwrap();
        let expected = PageRequest { offset: 5, limit: 5, category: "all".into() };
        assert_eq!(api.history(), vec![RecordedRequest::List(expected)]);
    }

    #[tokio::test]
    async fn single_hero_image_uses_id() {
        let hero = get_hero(&api(), "clark-kent").await.unwrap();
        assert_eq!(hero.image, "http://localhost:3000/images/1.jpeg");
    }

    #[tokio::test]
    async fn missing_hero_is_not_found() {
        let err = get_hero(&api(), "invalid-hero-slug").await.unwrap_err();
        assert_eq!(err, HeroError::not_found("invalid-hero-slug"));
    }

    #[tokio::test]
    async fn empty_search_makes_no_request() {
        let api = api();
        let heroes = search_heroes(&api, &SearchFilters::default()).await.unwrap();
        assert!(heroes.is_empty());
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn search_sends_only_present_filters() {
        let api = api();
        let filters = SearchFilters::default().with_name("bruce");
        let heroes = search_heroes(&api, &filters).await.unwrap();
        assert_eq!(heroes.len(), 1);
        assert_eq!(heroes[0].image, "http://localhost:3000/images/2.jpeg");
        assert_eq!(
            api.history(),
            vec![RecordedRequest::Search(vec![("name".to_string(), "bruce".to_string())])]
        );
    }

    #[tokio::test]
    async fn summary_images_are_left_alone() {
        let summary = get_summary(&api()).await.unwrap();
        assert_eq!(summary.total_heroes, 2);
        let strongest = summary.strongest_hero.unwrap();
        assert!(strongest.image.ends_with(".jpg"));
    }
}
