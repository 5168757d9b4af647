// The bilingual stimulus lexicon and trial-category inference.
//
// 90 Chinese/English word pairs across five stimulus categories. Recorded
// trial labels are untrusted; cleaning re-infers the category by matching
// the trial's word set against these definitions (in either language).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Language the participant chose at the start of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which word set one arrangement trial presented.
///
/// `AllWords` is the full 90-word trial; the rest are the five 10/20/30-word
/// subset trials. The snake_case forms are the labels used in session
/// documents and cleaned CSV columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialCategory {
    AllWords,
    Animals,
    BodyParts,
    Artifacts,
    EmotionalNonobject,
    NonemotionalNonobject,
}

impl TrialCategory {
    pub const SUBSETS: [TrialCategory; 5] = [
        TrialCategory::Animals,
        TrialCategory::BodyParts,
        TrialCategory::Artifacts,
        TrialCategory::EmotionalNonobject,
        TrialCategory::NonemotionalNonobject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialCategory::AllWords => "all_words",
            TrialCategory::Animals => "animals",
            TrialCategory::BodyParts => "body_parts",
            TrialCategory::Artifacts => "artifacts",
            TrialCategory::EmotionalNonobject => "emotional_nonobject",
            TrialCategory::NonemotionalNonobject => "nonemotional_nonobject",
        }
    }
}

impl fmt::Display for TrialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stimulus word in both languages, with its subset category.
#[derive(Debug, Clone, Copy)]
pub struct BilingualWord {
    pub zh: &'static str,
    pub en: &'static str,
    pub category: TrialCategory,
}

const fn word(
    zh: &'static str,
    en: &'static str,
    category: TrialCategory,
) -> BilingualWord {
    BilingualWord { zh, en, category }
}

use TrialCategory::{Animals, Artifacts, BodyParts, EmotionalNonobject, NonemotionalNonobject};

/// The full stimulus set, in the order the experiment page authored it.
pub const LEXICON: [BilingualWord; 90] = [
    word("蚂蚁", "ant", Animals),
    word("脚踝", "ankle", BodyParts),
    word("空调", "air conditioner", Artifacts),
    word("愤怒", "anger", EmotionalNonobject),
    word("协议", "agreement", NonemotionalNonobject),
    word("猫", "cat", Animals),
    word("胳膊", "arm", BodyParts),
    word("斧头", "ax", Artifacts),
    word("反感", "antipathy", EmotionalNonobject),
    word("买卖", "business", NonemotionalNonobject),
    word("大象", "elephant", Animals),
    word("耳朵", "ear", BodyParts),
    word("床", "bed", Artifacts),
    word("冷漠", "apathy", EmotionalNonobject),
    word("性质", "characteristic", NonemotionalNonobject),
    word("长颈鹿", "giraffe", Animals),
    word("眼睛", "eye", BodyParts),
    word("扫帚", "broom", Artifacts),
    word("慈善", "charity", EmotionalNonobject),
    word("概念", "concept", NonemotionalNonobject),
    word("熊猫", "panda", Animals),
    word("手指", "finger", BodyParts),
    word("柜子", "cabinet", Artifacts),
    word("舒心", "comfortable", EmotionalNonobject),
    word("内容", "content", NonemotionalNonobject),
    word("兔子", "rabbit", Animals),
    word("膝盖", "knee", BodyParts),
    word("椅子", "chair", Artifacts),
    word("死亡", "death", EmotionalNonobject),
    word("数据", "data", NonemotionalNonobject),
    word("老鼠", "rat", Animals),
    word("嘴唇", "lips", BodyParts),
    word("筷子", "chopsticks", Artifacts),
    word("债务", "debt", EmotionalNonobject),
    word("纪律", "discipline", NonemotionalNonobject),
    word("麻雀", "sparrow", Animals),
    word("鼻子", "nose", BodyParts),
    word("鼠标", "computer mouse", Artifacts),
    word("沮丧", "depressed", EmotionalNonobject),
    word("作用", "effect", NonemotionalNonobject),
    word("老虎", "tiger", Animals),
    word("肩膀", "shoulder", BodyParts),
    word("锤子", "hammer", Artifacts),
    word("疾病", "disease", EmotionalNonobject),
    word("身份", "identity", NonemotionalNonobject),
    word("乌龟", "tortoise", Animals),
    word("大腿", "thigh", BodyParts),
    word("钥匙", "key", Artifacts),
    word("纠纷", "dispute", EmotionalNonobject),
    word("方法", "method", NonemotionalNonobject),
    word("微波炉", "microwave", Artifacts),
    word("错误", "error", EmotionalNonobject),
    word("义务", "obligation", NonemotionalNonobject),
    word("铅笔", "pencil", Artifacts),
    word("兴奋", "excited", EmotionalNonobject),
    word("现象", "phenomenon", NonemotionalNonobject),
    word("冰箱", "refrigerator", Artifacts),
    word("缘分", "fate", EmotionalNonobject),
    word("过程", "process", NonemotionalNonobject),
    word("剪刀", "scissors", Artifacts),
    word("过失", "fault", EmotionalNonobject),
    word("原因", "reason", NonemotionalNonobject),
    word("沙发", "sofa", Artifacts),
    word("恐惧", "fear", EmotionalNonobject),
    word("关系", "relationship", NonemotionalNonobject),
    word("勺子", "spoon", Artifacts),
    word("骗局", "fraud", EmotionalNonobject),
    word("结果", "result", NonemotionalNonobject),
    word("桌子", "table", Artifacts),
    word("友情", "friendship", EmotionalNonobject),
    word("社会", "society", NonemotionalNonobject),
    word("电视", "television", Artifacts),
    word("快乐", "happy", EmotionalNonobject),
    word("地位", "status", NonemotionalNonobject),
    word("牙刷", "toothbrush", Artifacts),
    word("天堂", "heaven", EmotionalNonobject),
    word("制度", "system", NonemotionalNonobject),
    word("洗衣机", "washing machine", Artifacts),
    word("敌意", "hostility", EmotionalNonobject),
    word("团队", "team", NonemotionalNonobject),
    word("爱心", "loving heart", EmotionalNonobject),
    word("魔力", "magic power", EmotionalNonobject),
    word("婚姻", "marriage", EmotionalNonobject),
    word("奇迹", "miracle", EmotionalNonobject),
    word("骄傲", "proud", EmotionalNonobject),
    word("难过", "sad", EmotionalNonobject),
    word("风景", "scenery", EmotionalNonobject),
    word("光彩", "splendor", EmotionalNonobject),
    word("创伤", "trauma", EmotionalNonobject),
    word("暴力", "violence", EmotionalNonobject),
];

/// The words a trial of `category` presents, in lexicon order.
pub fn words_for(category: TrialCategory, language: Language) -> Vec<&'static str> {
    LEXICON
        .iter()
        .filter(|w| category == TrialCategory::AllWords || w.category == category)
        .map(|w| match language {
            Language::Zh => w.zh,
            Language::En => w.en,
        })
        .collect()
}

/// English translation of a Chinese stimulus word, if it is in the lexicon.
pub fn english_for(zh: &str) -> Option<&'static str> {
    LEXICON.iter().find(|w| w.zh == zh).map(|w| w.en)
}

/// Infer which trial category a word set belongs to, matching against the
/// Chinese forms first and the English forms second. Returns `None` when
/// the set matches no category exactly (extra, missing, or foreign words).
pub fn infer_trial_category<S: AsRef<str>>(trial_words: &[S]) -> Option<TrialCategory> {
    let set: HashSet<&str> = trial_words.iter().map(|w| w.as_ref()).collect();

    let candidates = [
        TrialCategory::AllWords,
        TrialCategory::Animals,
        TrialCategory::BodyParts,
        TrialCategory::Artifacts,
        TrialCategory::EmotionalNonobject,
        TrialCategory::NonemotionalNonobject,
    ];

    for language in [Language::Zh, Language::En] {
        for category in candidates {
            let expected: HashSet<&str> = words_for(category, language).into_iter().collect();
            if set == expected {
                return Some(category);
            }
        }
    }
    None
}
