use hero_core::images::{resolve_image, ImageKey};
use hero_core::model::Hero;
use hero_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn image_url_shape_holds_for_any_id() {
    for id in ["1", "42", "clark-kent", ""] {
        let hero = resolve_image(Hero::new(id, "x"), "http://localhost:3000", ImageKey::Id);
        assert_eq!(hero.image, format!("http://localhost:3000/images/{id}.jpeg"));
    }
}
