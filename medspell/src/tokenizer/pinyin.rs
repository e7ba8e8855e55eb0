//! Pinyin readings backed by the `pinyin` crate.
use pinyin::{ToPinyin, ToPinyinMulti};
use smol_str::SmolStr;

use super::{Syllable, Transliterate};

const INITIALS: &[&str] = &[
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s",
];

/// Every standard Mandarin syllable, plain spelling.
pub const SYLLABLES: &[&str] = &[
    "a", "ai", "an", "ang", "ao", "ba", "bai", "ban", "bang", "bao", "bei", "ben", "beng", "bi",
    "bian", "biao", "bie", "bin", "bing", "bo", "bu", "ca", "cai", "can", "cang", "cao", "ce",
    "cen", "ceng", "cha", "chai", "chan", "chang", "chao", "che", "chen", "cheng", "chi", "chong",
    "chou", "chu", "chua", "chuai", "chuan", "chuang", "chui", "chun", "chuo", "ci", "cong", "cou",
    "cu", "cuan", "cui", "cun", "cuo", "da", "dai", "dan", "dang", "dao", "de", "dei", "den",
    "deng", "di", "dia", "dian", "diao", "die", "ding", "diu", "dong", "dou", "du", "duan", "dui",
    "dun", "duo", "e", "ei", "en", "eng", "er", "fa", "fan", "fang", "fei", "fen", "feng", "fo",
    "fou", "fu", "ga", "gai", "gan", "gang", "gao", "ge", "gei", "gen", "geng", "gong", "gou",
    "gu", "gua", "guai", "guan", "guang", "gui", "gun", "guo", "ha", "hai", "han", "hang", "hao",
    "he", "hei", "hen", "heng", "hong", "hou", "hu", "hua", "huai", "huan", "huang", "hui", "hun",
    "huo", "ji", "jia", "jian", "jiang", "jiao", "jie", "jin", "jing", "jiong", "jiu", "ju",
    "juan", "jue", "jun", "ka", "kai", "kan", "kang", "kao", "ke", "kei", "ken", "keng", "kong",
    "kou", "ku", "kua", "kuai", "kuan", "kuang", "kui", "kun", "kuo", "la", "lai", "lan", "lang",
    "lao", "le", "lei", "leng", "li", "lia", "lian", "liang", "liao", "lie", "lin", "ling", "liu",
    "lo", "long", "lou", "lu", "luan", "lun", "luo", "lv", "lve", "ma", "mai", "man", "mang",
    "mao", "me", "mei", "men", "meng", "mi", "mian", "miao", "mie", "min", "ming", "miu", "mo",
    "mou", "mu", "na", "nai", "nan", "nang", "nao", "ne", "nei", "nen", "neng", "ni", "nian",
    "niang", "niao", "nie", "nin", "ning", "niu", "nong", "nou", "nu", "nuan", "nun", "nuo", "nv",
    "nve", "o", "ou", "pa", "pai", "pan", "pang", "pao", "pei", "pen", "peng", "pi", "pian",
    "piao", "pie", "pin", "ping", "po", "pou", "pu", "qi", "qia", "qian", "qiang", "qiao", "qie",
    "qin", "qing", "qiong", "qiu", "qu", "quan", "que", "qun", "ran", "rang", "rao", "re", "ren",
    "reng", "ri", "rong", "rou", "ru", "rua", "ruan", "rui", "run", "ruo", "sa", "sai", "san",
    "sang", "sao", "se", "sen", "seng", "sha", "shai", "shan", "shang", "shao", "she", "shei",
    "shen", "sheng", "shi", "shou", "shu", "shua", "shuai", "shuan", "shuang", "shui", "shun",
    "shuo", "si", "song", "sou", "su", "suan", "sui", "sun", "suo", "ta", "tai", "tan", "tang",
    "tao", "te", "tei", "teng", "ti", "tian", "tiao", "tie", "ting", "tong", "tou", "tu", "tuan",
    "tui", "tun", "tuo", "wa", "wai", "wan", "wang", "wei", "wen", "weng", "wo", "wu", "xi", "xia",
    "xian", "xiang", "xiao", "xie", "xin", "xing", "xiong", "xiu", "xu", "xuan", "xue", "xun",
    "ya", "yan", "yang", "yao", "ye", "yi", "yin", "ying", "yo", "yong", "you", "yu", "yuan",
    "yue", "yun", "za", "zai", "zan", "zang", "zao", "ze", "zei", "zen", "zeng", "zha", "zhai",
    "zhan", "zhang", "zhao", "zhe", "zhei", "zhen", "zheng", "zhi", "zhong", "zhou", "zhu",
    "zhua", "zhuai", "zhuan", "zhuang", "zhui", "zhun", "zhuo", "zi", "zong", "zou", "zu", "zuan",
    "zui", "zun", "zuo", "m", "n", "ng", "hm", "hng",
];

/// Splits a plain syllable into initial and final using strict rules.
///
/// `y` and `w` are not initials, `ü` is written `v`, and the abbreviated
/// finals `iu`, `ui` and `un` are restored to `iou`, `uei` and `uen`.
pub fn decompose(plain: &str) -> Syllable {
    let s = plain.to_lowercase().replace('ü', "v");

    if let Some(rest) = s.strip_prefix('y') {
        let rhyme = if rest.starts_with('i') {
            rest.to_string()
        } else if let Some(tail) = rest.strip_prefix('u') {
            format!("v{}", tail)
        } else {
            format!("i{}", rest)
        };
        return Syllable::new("", &rhyme);
    }

    if let Some(rest) = s.strip_prefix('w') {
        let rhyme = if rest.starts_with('u') {
            rest.to_string()
        } else {
            format!("u{}", rest)
        };
        return Syllable::new("", &rhyme);
    }

    let initial = INITIALS
        .iter()
        .find(|i| s.starts_with(*i))
        .copied()
        .unwrap_or("");
    let rest = &s[initial.len()..];

    let rhyme = match (initial, rest) {
        ("j" | "q" | "x", r) if r.starts_with('u') => format!("v{}", &r[1..]),
        (_, "iu") => "iou".to_string(),
        (_, "ui") => "uei".to_string(),
        (_, "un") => "uen".to_string(),
        (_, r) => r.to_string(),
    };

    Syllable::new(initial, &rhyme)
}

/// Transliterator using the character tables of the `pinyin` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinTransliterator;

impl Transliterate for PinyinTransliterator {
    fn readings(&self, ch: char, heteronyms: bool) -> Vec<SmolStr> {
        if heteronyms {
            match ch.to_pinyin_multi() {
                Some(multi) => multi.into_iter().map(|p| SmolStr::new(p.plain())).collect(),
                None => vec![],
            }
        } else {
            ch.to_pinyin()
                .map(|p| vec![SmolStr::new(p.plain())])
                .unwrap_or_default()
        }
    }

    fn inventory(&self) -> Vec<Syllable> {
        SYLLABLES.iter().map(|s| decompose(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(s: &str) -> (String, String) {
        let syllable = decompose(s);
        (syllable.initial.to_string(), syllable.rhyme.to_string())
    }

    #[test]
    fn strict_decomposition() {
        assert_eq!(parts("zhang"), ("zh".into(), "ang".into()));
        assert_eq!(parts("yi"), ("".into(), "i".into()));
        assert_eq!(parts("you"), ("".into(), "iou".into()));
        assert_eq!(parts("yu"), ("".into(), "v".into()));
        assert_eq!(parts("yuan"), ("".into(), "van".into()));
        assert_eq!(parts("wei"), ("".into(), "uei".into()));
        assert_eq!(parts("wu"), ("".into(), "u".into()));
        assert_eq!(parts("liu"), ("l".into(), "iou".into()));
        assert_eq!(parts("hui"), ("h".into(), "uei".into()));
        assert_eq!(parts("lun"), ("l".into(), "uen".into()));
        assert_eq!(parts("ju"), ("j".into(), "v".into()));
        assert_eq!(parts("xue"), ("x".into(), "ve".into()));
        assert_eq!(parts("lü"), ("l".into(), "v".into()));
        assert_eq!(parts("er"), ("".into(), "er".into()));
    }

    #[test]
    fn full_spelling_joins_parts() {
        assert_eq!(decompose("liu").full, "liou");
        assert_eq!(decompose("wang").full, "uang");
    }

    #[test]
    fn pinyin_readings() {
        let t = PinyinTransliterator;
        assert_eq!(t.readings('头', false), vec![SmolStr::new("tou")]);
        assert!(t.readings('W', true).is_empty());

        let sets = t.token_sets("头孢", true);
        assert!(sets[0].syllables().any(|s| s.full == "tou"));
        assert!(sets[1].syllables().any(|s| s.full == "bao"));
    }
}
