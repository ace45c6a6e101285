use super::*;
use crate::asset::Filesystem;
use crate::url::{HmacSigner, Signer};

fn source() -> Source {
    let mut source = Source::new("demo");
    source.public_key = Some("public_demo".to_string());
    source.private_key = Some("private_demo".to_string());
    source
}

fn url(source: &Source, asset: AssetRef<'_>, params: ParamSet) -> String {
    let ctx = ProviderContext::new(&HmacSigner);
    ImagekitProvider.get_url(&ctx, source, asset, params).unwrap().unwrap()
}

fn tr(params: ParamSet) -> String {
    map_params(&params, None).render()
}

#[test]
fn test_default_endpoint_from_handle() {
    let result = url(&source(), AssetRef::Path("a.jpg"), ParamSet::new().with("w", 400));
    assert_eq!(result, "https://ik.imagekit.io/render/demo/a.jpg?tr=w-400");
}

#[test]
fn test_endpoint_gets_scheme_and_loses_trailing_slash() {
    let mut source = source();
    source.endpoint = Some("ik.imagekit.io/acme/".to_string());
    let result = url(&source, AssetRef::Path("a.jpg"), ParamSet::new().with("w", 400));
    assert_eq!(result, "https://ik.imagekit.io/acme/a.jpg?tr=w-400");
}

#[test]
fn test_no_params_no_query() {
    let result = url(&source(), AssetRef::Path("a.jpg"), ParamSet::new());
    assert_eq!(result, "https://ik.imagekit.io/render/demo/a.jpg");
}

#[test]
fn test_missing_public_key_is_error() {
    let mut source = source();
    source.public_key = None;
    let ctx = ProviderContext::new(&HmacSigner);
    let result = ImagekitProvider.get_url(&ctx, &source, AssetRef::Path("a.jpg"), ParamSet::new());
    assert!(matches!(result, Err(ImgixerError::MissingCredentials(handle)) if handle == "demo"));
}

#[test]
fn test_missing_private_key_is_error() {
    let mut source = source();
    source.private_key = None;
    let ctx = ProviderContext::new(&HmacSigner);
    let result = ImagekitProvider.get_url(&ctx, &source, AssetRef::Path("a.jpg"), ParamSet::new());
    assert!(matches!(result, Err(ImgixerError::MissingCredentials(_))));
}

#[test]
fn test_private_key_falls_back_to_key() {
    let mut source = source();
    source.private_key = None;
    source.key = Some("legacy".to_string());
    source.signed = true;
    let result = url(&source, AssetRef::Path("a.jpg"), ParamSet::new().with("w", 400));
    let signature = HmacSigner.sign("legacy", "a.jpg?tr=w-4009999999999");
    assert_eq!(
        result,
        format!("https://ik.imagekit.io/render/demo/a.jpg?tr=w-400&ik-s={}", signature)
    );
}

#[test]
fn test_signed_url() {
    let result = url(
        &source(),
        AssetRef::Path("a.jpg"),
        ParamSet::new().with("w", 400).with("signed", true),
    );
    let signature = HmacSigner.sign("private_demo", "a.jpg?tr=w-4009999999999");
    assert_eq!(
        result,
        format!("https://ik.imagekit.io/render/demo/a.jpg?tr=w-400&ik-s={}", signature)
    );
}

#[test]
fn test_asset_version_is_sorted_transform_token() {
    let asset = Asset::new("photos/cat.jpg", 800, 600).with_last_modified(1_700_000_000);
    let result = url(&source(), AssetRef::Asset(&asset), ParamSet::new().with("w", 400));
    assert_eq!(
        result,
        "https://ik.imagekit.io/render/demo/photos/cat.jpg?tr=dm-1700000000,w-400"
    );
}

#[test]
fn test_platform_project_slug_removed() {
    let asset = Asset::new("cat.jpg", 800, 600)
        .with_last_modified(1)
        .with_volume_subfolder("my-project/images")
        .on_filesystem(Filesystem::Platform);
    let result = url(&source(), AssetRef::Asset(&asset), ParamSet::new());
    assert_eq!(result, "https://ik.imagekit.io/render/demo/images/cat.jpg?tr=dm-1");
}

#[test]
fn test_control_keys_never_forwarded() {
    let params = ParamSet::new()
        .with("w", 400)
        .with("from", 100)
        .with("to", 500)
        .with("step", 100)
        .with("source", "demo")
        .with("signed", false);
    let result = url(&source(), AssetRef::Path("a.jpg"), params);
    assert_eq!(result, "https://ik.imagekit.io/render/demo/a.jpg?tr=w-400");
}

#[test]
fn test_default_params_merged_underneath() {
    let mut source = source();
    source.default_params = ParamSet::new().with("q", 60).with("w", 100);
    let result = url(&source, AssetRef::Path("a.jpg"), ParamSet::new().with("w", 400));
    assert_eq!(result, "https://ik.imagekit.io/render/demo/a.jpg?tr=q-60,w-400");
}

#[test]
fn test_transformation_value_is_encoded() {
    let result = url(
        &source(),
        AssetRef::Path("a.jpg"),
        ParamSet::new().with("fill-color", "#FFFFFF").with("fit", "fill"),
    );
    assert_eq!(
        result,
        "https://ik.imagekit.io/render/demo/a.jpg?tr=bg-%23FFFFFF,cm-pad_resize"
    );
}

#[test]
fn test_idempotent() {
    let asset = Asset::new("a.jpg", 2000, 1000).with_last_modified(3);
    let params = ParamSet::new()
        .with("fit", "crop")
        .with("crop", "focalpoint")
        .with("w", 600)
        .with("h", 300)
        .with("fp-x", 0.3)
        .with("fp-y", 0.7);
    assert_eq!(
        url(&source(), AssetRef::Asset(&asset), params.clone()),
        url(&source(), AssetRef::Asset(&asset), params)
    );
}

#[test]
fn test_aspect_ratio_replaces_colon() {
    assert_eq!(tr(ParamSet::new().with("ar", "16:9")), "ar-16-9");
}

#[test]
fn test_aspect_ratio_conflict_drops_height_when_wider() {
    let params = ParamSet::new().with("ar", "16:9").with("w", 1600).with("h", 900);
    assert_eq!(tr(params), "ar-16-9,w-1600");
}

#[test]
fn test_aspect_ratio_conflict_drops_width_when_taller() {
    let params = ParamSet::new().with("ar", "9:16").with("w", 900).with("h", 1600);
    assert_eq!(tr(params), "ar-9-16,h-1600");
}

#[test]
fn test_auto_format_and_enhance() {
    assert_eq!(tr(ParamSet::new().with("auto", "format")), "f-auto");
    assert_eq!(
        tr(ParamSet::new().with("auto", "format, enhance")),
        "f-auto,e-contrast,e-usm-2-2-0.8-0.024"
    );
    assert_eq!(tr(ParamSet::new().with("auto", "compress")), "");
}

#[test]
fn test_blur_rescaled_and_clamped() {
    assert_eq!(tr(ParamSet::new().with("blur", 2000)), "bl-100");
    assert_eq!(tr(ParamSet::new().with("blur", 500)), "bl-50");
    assert_eq!(tr(ParamSet::new().with("blur", 5)), "bl-0");
}

#[test]
fn test_border_goes_to_post_stage() {
    assert_eq!(tr(ParamSet::new().with("border", "2,FF0000")), "b-2_FF0000");
    assert_eq!(
        tr(ParamSet::new().with("border", "2, FF0000").with("w", 100)),
        "w-100:b-2_FF0000"
    );
}

#[test]
fn test_contrast() {
    assert_eq!(tr(ParamSet::new().with("con", 20)), "e-contrast");
    assert_eq!(tr(ParamSet::new().with("con", 0)), "");
    assert_eq!(tr(ParamSet::new().with("con", -20)), "");
}

#[test]
fn test_crop_focus_modes() {
    assert_eq!(tr(ParamSet::new().with("crop", "faces")), "fo-face");
    assert_eq!(tr(ParamSet::new().with("crop", "faces,center")), "fo-face");
    assert_eq!(tr(ParamSet::new().with("crop", "entropy")), "fo-entropy");
    assert_eq!(tr(ParamSet::new().with("crop", "top,left")), "fo-top_left");
    assert_eq!(tr(ParamSet::new().with("crop", vec!["bottom", "right"])), "fo-bottom_right");
}

#[test]
fn test_fit_table() {
    let cases = [
        ("clip", "c-at_max"),
        ("max", "c-at_max"),
        ("min", "c-at_min"),
        ("crop", "c-maintain_ratio"),
        ("facearea", "c-maintain_ratio,fo-face"),
        ("fill", "cm-pad_resize"),
        ("fillmax", "cm-pad_resize"),
        ("scale", "c-force"),
    ];
    for (fit, expected) in cases {
        assert_eq!(tr(ParamSet::new().with("fit", fit)), expected, "fit={}", fit);
    }
}

#[test]
fn test_unknown_fit_dropped() {
    assert_eq!(tr(ParamSet::new().with("fit", "stretch")), "");
}

#[test]
fn test_fillmax_compares_against_asset() {
    let asset = Asset::new("a.jpg", 800, 600);
    let larger = ParamSet::new().with("fit", "fillmax").with("w", 1000);
    assert_eq!(map_params(&larger, Some(&asset)).render(), "cm-pad_extract,w-1000");

    let taller = ParamSet::new().with("fit", "fillmax").with("h", 700);
    assert_eq!(map_params(&taller, Some(&asset)).render(), "cm-pad_extract,h-700");

    let smaller = ParamSet::new().with("fit", "fillmax").with("w", 400);
    assert_eq!(map_params(&smaller, Some(&asset)).render(), "cm-pad_resize,w-400");
}

#[test]
fn test_format_selection() {
    assert_eq!(tr(ParamSet::new().with("fm", "webp")), "f-webp");
    assert_eq!(tr(ParamSet::new().with("fm", "jpeg")), "f-jpeg");
    assert_eq!(tr(ParamSet::new().with("fm", "gif")), "f-auto");
    assert_eq!(tr(ParamSet::new().with("fm", "pjpg")), "f-auto");
}

#[test]
fn test_auto_format_not_overridden_by_fm() {
    let params = ParamSet::new().with("auto", "format").with("fm", "png");
    assert_eq!(tr(params), "f-auto");
}

#[test]
fn test_focal_point_crop() {
    let asset = Asset::new("a.jpg", 2000, 1000);
    let params = ParamSet::new()
        .with("fit", "crop")
        .with("crop", "focalpoint")
        .with("w", 1000)
        .with("h", 500)
        .with("fp-x", 0.5)
        .with("fp-y", 0.5);
    assert_eq!(
        map_params(&params, Some(&asset)).render(),
        "w-1000:cm-extract,c-maintain_ratio,xc-500,yc-250,h-500,w-1000"
    );
}

#[test]
fn test_focal_point_zoom_clamped_to_bounds() {
    let asset = Asset::new("a.jpg", 2000, 1000);
    let params = ParamSet::new()
        .with("crop", "focalpoint")
        .with("w", 1000)
        .with("h", 500)
        .with("fp-x", 0.9)
        .with("fp-y", 0.1)
        .with("fp-z", 2);
    assert_eq!(
        map_params(&params, Some(&asset)).render(),
        "w-2000:cm-extract,xc-1500,yc-250,h-500,w-1000"
    );
}

#[test]
fn test_focal_point_crop_by_height_only() {
    let params = ParamSet::new().with("crop", "focalpoint").with("h", 300);
    assert_eq!(tr(params), "h-300:cm-extract,h-300");
}

#[test]
fn test_focal_coordinates_need_dimensions() {
    let params = ParamSet::new().with("fp-x", 0.5).with("fp-y", 0.5);
    assert_eq!(tr(params), "");

    // fp-y also needs the asset's proportions
    let params = ParamSet::new().with("fp-x", 0.5).with("fp-y", 0.5).with("w", 100).with("h", 100);
    assert_eq!(tr(params), "xc-50,h-100,w-100");
}

#[test]
fn test_saturation_only_full_greyscale() {
    assert_eq!(tr(ParamSet::new().with("sat", -100)), "e-grayscale");
    assert_eq!(tr(ParamSet::new().with("sat", -50)), "");
}

#[test]
fn test_fill_color_forces_pad_without_fit() {
    assert_eq!(tr(ParamSet::new().with("fill-color", "FFFFFF")), "bg-FFFFFF,cm-pad_resize");
    assert_eq!(
        tr(ParamSet::new().with("fill-color", "FFFFFF").with("fit", "clip")),
        "bg-FFFFFF,c-at_max"
    );
}

#[test]
fn test_simple_renames() {
    assert_eq!(tr(ParamSet::new().with("cs", "adobergb1998")), "cp-true");
    assert_eq!(tr(ParamSet::new().with("cs", "srgb")), "");
    assert_eq!(tr(ParamSet::new().with("lossless", true)), "lo-true");
    assert_eq!(tr(ParamSet::new().with("radius", 20)), "r-20");
    assert_eq!(tr(ParamSet::new().with("rot", 90)), "rt-90");
    assert_eq!(tr(ParamSet::new().with("sharp", 10)), "e-sharpen-10");
    assert_eq!(tr(ParamSet::new().with("trim", "auto")), "t-true");
    assert_eq!(tr(ParamSet::new().with("trim-tol", 5)), "t-5");
}

#[test]
fn test_unknown_keys_pass_through_as_tokens() {
    assert_eq!(tr(ParamSet::new().with("q", 80)), "q-80");
    assert_eq!(tr(ParamSet::new().with("x", "a b,c")), "x-ab_c");
}

#[test]
fn test_stage_replaces_in_place() {
    let mut stage = Stage::default();
    stage.value("f", "webp");
    stage.flag("e-contrast");
    stage.value("f", "auto");
    assert_eq!(stage.render(), "f-auto,e-contrast");
    stage.remove("f");
    assert_eq!(stage.render(), "e-contrast");
}
