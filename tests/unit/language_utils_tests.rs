/*!
 * Tests for language utilities
 */

use reflexlate::language_utils::{
    LanguagePair, SUPPORTED_LANGUAGES, get_language_name, normalize_to_part2t, resolve_language_name,
};

#[test]
fn test_normalizeToPart2t_withVariousCodes_shouldReturnPart2t() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("FR").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("english").is_err());
}

#[test]
fn test_getLanguageName_withCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
}

#[test]
fn test_resolveLanguageName_withCodesAndNames_shouldReturnDisplayName() {
    assert_eq!(resolve_language_name("fr").unwrap(), "French");
    assert_eq!(resolve_language_name(" French ").unwrap(), "French");
    assert_eq!(resolve_language_name("english").unwrap(), "English");
    assert_eq!(resolve_language_name("German").unwrap(), "German");
}

#[test]
fn test_resolveLanguageName_withUnknownInput_shouldFail() {
    assert!(resolve_language_name("   ").is_err());
    assert!(resolve_language_name("notalanguage").is_err());
}

#[test]
fn test_languagePair_fromSource_shouldPickOtherSupportedLanguage() {
    let pair = LanguagePair::from_source("french").unwrap();
    assert_eq!(pair, LanguagePair::new("French", "English"));
    assert!(LanguagePair::from_source("German").is_none());
}

#[test]
fn test_languagePair_swapped_shouldReverseDirection() {
    let pair = LanguagePair::default();
    assert_eq!(pair.source, SUPPORTED_LANGUAGES[0]);
    assert_eq!(pair.swapped(), LanguagePair::new("French", "English"));
    assert_eq!(pair.swapped().swapped(), pair);
}
