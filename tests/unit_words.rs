// Unit tests for the lexicon and trial-category inference.

use semspace::words::{
    english_for, infer_trial_category, words_for, Language, TrialCategory, LEXICON,
};

#[test]
fn lexicon_has_ninety_words() {
    assert_eq!(LEXICON.len(), 90);
    assert_eq!(words_for(TrialCategory::AllWords, Language::Zh).len(), 90);
    assert_eq!(words_for(TrialCategory::AllWords, Language::En).len(), 90);
}

#[test]
fn subset_sizes_match_the_design() {
    let sizes = [
        (TrialCategory::Animals, 10),
        (TrialCategory::BodyParts, 10),
        (TrialCategory::Artifacts, 20),
        (TrialCategory::EmotionalNonobject, 30),
        (TrialCategory::NonemotionalNonobject, 20),
    ];
    for (category, expected) in sizes {
        assert_eq!(
            words_for(category, Language::Zh).len(),
            expected,
            "{category}"
        );
    }
}

#[test]
fn infer_full_set_zh() {
    let words = words_for(TrialCategory::AllWords, Language::Zh);
    assert_eq!(infer_trial_category(&words), Some(TrialCategory::AllWords));
}

#[test]
fn infer_subset_categories_zh() {
    for category in TrialCategory::SUBSETS {
        let words = words_for(category, Language::Zh);
        assert_eq!(infer_trial_category(&words), Some(category), "{category}");
    }
}

#[test]
fn infer_subset_categories_en() {
    for category in TrialCategory::SUBSETS {
        let words = words_for(category, Language::En);
        assert_eq!(infer_trial_category(&words), Some(category), "{category}");
    }
}

#[test]
fn inference_ignores_word_order_and_repeats() {
    let mut words = words_for(TrialCategory::Animals, Language::Zh);
    words.reverse();
    words.push(words[0]); // duplicate entry, same set
    assert_eq!(infer_trial_category(&words), Some(TrialCategory::Animals));
}

#[test]
fn unknown_word_set_yields_none() {
    assert_eq!(infer_trial_category(&["foo", "bar"]), None);
    assert_eq!(infer_trial_category::<&str>(&[]), None);
}

#[test]
fn near_miss_set_yields_none() {
    // One animal short: not a valid trial.
    let mut words = words_for(TrialCategory::Animals, Language::Zh);
    words.pop();
    assert_eq!(infer_trial_category(&words), None);

    // One animal swapped for a body part: also invalid.
    let mut words = words_for(TrialCategory::Animals, Language::Zh);
    words[0] = "耳朵";
    assert_eq!(infer_trial_category(&words), None);
}

#[test]
fn mixed_language_set_yields_none() {
    let mut words = words_for(TrialCategory::Animals, Language::Zh);
    words[0] = "ant";
    assert_eq!(infer_trial_category(&words), None);
}

#[test]
fn category_labels_are_snake_case() {
    assert_eq!(TrialCategory::AllWords.as_str(), "all_words");
    assert_eq!(TrialCategory::BodyParts.as_str(), "body_parts");
    assert_eq!(
        TrialCategory::EmotionalNonobject.as_str(),
        "emotional_nonobject"
    );

    // serde uses the same labels as as_str/Display.
    let json = serde_json::to_string(&TrialCategory::NonemotionalNonobject).unwrap();
    assert_eq!(json, "\"nonemotional_nonobject\"");
    let back: TrialCategory = serde_json::from_str(&json).unwrap();
    assert_eq!(back, TrialCategory::NonemotionalNonobject);
}

#[test]
fn language_labels_round_trip() {
    assert_eq!(Language::Zh.as_str(), "zh");
    assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    let back: Language = serde_json::from_str("\"zh\"").unwrap();
    assert_eq!(back, Language::Zh);
}

#[test]
fn english_lookup() {
    assert_eq!(english_for("蚂蚁"), Some("ant"));
    assert_eq!(english_for("洗衣机"), Some("washing machine"));
    assert_eq!(english_for("ant"), None);
}
