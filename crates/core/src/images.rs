//! Image URL resolution.
//!
//! The backend stores bare filenames (`"1.jpg"`); clients render from
//! `{base}/images/{key}.jpeg`. Resolution happens once per fetch on the
//! fetched copy and is never written back anywhere.

use crate::model::Hero;

/// Which part of the record names the image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKey {
    /// Use the hero id (single-hero and search results).
    Id,
    /// Use the stem of the filename the backend provided (paged list results).
    /// Falls back to the id when no filename is present.
    FilenameStem,
}

/// Compute the fully-qualified image URL for a key.
pub fn image_url(base_url: &str, key: &str) -> String {
    format!("{}/images/{}.jpeg", base_url.trim_end_matches('/'), key)
}

/// Return `hero` with its `image` rewritten to an absolute URL.
///
/// Never fails: a hero with no id (and no filename) yields
/// `{base}/images/.jpeg`, leaving it to the renderer to show a broken image.
pub fn resolve_image(mut hero: Hero, base_url: &str, key: ImageKey) -> Hero {
    let stem = match key {
        ImageKey::Id => hero.id.clone(),
        ImageKey::FilenameStem => match filename_stem(&hero.image) {
            Some(stem) => stem.to_string(),
            None => hero.id.clone(),
        },
    };
    hero.image = image_url(base_url, &stem);
    hero
}

/// Resolve every hero in a list.
pub fn resolve_images(heroes: Vec<Hero>, base_url: &str, key: ImageKey) -> Vec<Hero> {
    heroes.into_iter().map(|hero| resolve_image(hero, base_url, key)).collect()
}

fn filename_stem(image: &str) -> Option<&str> {
    let file = image.rsplit('/').next().unwrap_or(image);
    let stem = match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    };
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3000";

    #[test]
    fn id_key_builds_jpeg_url() {
        let hero = resolve_image(Hero::new("1", "Clark Kent"), BASE, ImageKey::Id);
        assert_eq!(hero.image, "http://localhost:3000/images/1.jpeg");
    }

    #[test]
    fn filename_stem_replaces_extension() {
        let hero = Hero::new("1", "Clark Kent").with_image("1.jpg");
        let hero = resolve_image(hero, BASE, ImageKey::FilenameStem);
        assert_eq!(hero.image, "http://localhost:3000/images/1.jpeg");

        let hero = Hero::new("9", "Diana").with_image("wonder-woman.png");
        let hero = resolve_image(hero, BASE, ImageKey::FilenameStem);
        assert_eq!(hero.image, "http://localhost:3000/images/wonder-woman.jpeg");
    }

    #[test]
    fn filename_stem_falls_back_to_id() {
        let hero = resolve_image(Hero::new("4", "Logan"), BASE, ImageKey::FilenameStem);
        assert_eq!(hero.image, "http://localhost:3000/images/4.jpeg");
    }

    #[test]
    fn missing_id_is_best_effort() {
        let hero = resolve_image(Hero::default(), BASE, ImageKey::Id);
        assert_eq!(hero.image, "http://localhost:3000/images/.jpeg");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        assert_eq!(image_url("http://api.test/", "2"), "http://api.test/images/2.jpeg");
    }

    #[test]
    fn every_hero_in_a_list_is_resolved() {
        let heroes = vec![Hero::new("1", "a"), Hero::new("2", "b"), Hero::new("3", "c")];
        for hero in resolve_images(heroes, BASE, ImageKey::Id) {
            assert_eq!(hero.image, format!("{BASE}/images/{}.jpeg", hero.id));
        }
    }
}
