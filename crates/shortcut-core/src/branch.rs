//! Branch name ⇄ story id.

use crate::template::{BranchTemplate, Placeholder, TemplateError};
use crate::types::Story;

/// Prefix put in front of story ids in branch names and commit messages.
pub const STORY_CODE: &str = "sc";

/// `sc-<id>`
pub fn story_code(id: u64) -> String {
    format!("{STORY_CODE}-{id}")
}

/// Build a branch name for `story` from `template`.
///
/// `username` fills `[owner_username]`; a template that uses it without a
/// username fails with [`TemplateError::MissingValue`].
pub fn name_from_story(
    story: &Story,
    template: &BranchTemplate,
    username: Option<&str>,
) -> Result<String, TemplateError> {
    let id = story_code(story.id);
    let slug = kebab_case(&story.name);
    let username = username.filter(|u| !u.is_empty());

    template.render(|p| match p {
        Placeholder::StoryId => Some(id.as_str()),
        Placeholder::StoryType => Some(story.story_type.as_str()),
        Placeholder::StoryName => Some(slug.as_str()),
        Placeholder::OwnerUsername => username,
    })
}

/// Parse `format` and build a branch name from it.
pub fn name_from_format(
    story: &Story,
    format: &str,
    username: Option<&str>,
) -> Result<String, TemplateError> {
    let template = BranchTemplate::parse(format)?;
    name_from_story(story, &template, username)
}

/// Recover a story id from a branch name shaped `<segment>/<id-segment>/<slug>`.
///
/// Takes the second `/`-separated segment and keeps only its digits. This is
/// only the inverse of [`name_from_story`] under the default template; branches
/// cut from a custom template may decode to the wrong id or to nothing.
pub fn id_from_branch_name(branch: &str) -> Option<u64> {
    let segment = branch.split('/').nth(1)?;
    let digits: String = segment.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Lower-case words joined by `-`.
///
/// Latin letters lose their accents first (`Crème` → `creme`). Words break on
/// any non-alphanumeric character, on lower→upper case changes, before the
/// last capital of an acronym run (`HTTPServer` → `http-server`) and between
/// letters and digits. Apostrophes are dropped so `don't` stays one word.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input
        .chars()
        .flat_map(|c| match deburr(c) {
            Some(plain) => plain.chars().collect::<Vec<_>>(),
            None => vec![c],
        })
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect();

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            if prev.is_alphanumeric() && is_word_break(prev, c, next) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Plain-ASCII spelling of a Latin-1 Supplement or Latin Extended-A letter.
///
/// Combining diacritical marks map to nothing; any other char is `None` and
/// kept as is.
fn deburr(c: char) -> Option<&'static str> {
    let plain = match c {
        '\u{300}'..='\u{36f}' => "",
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "Ae",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È'..='Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì'..='Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' | 'ĸ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' | 'Ŋ' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŋ' => "n",
        'ŉ' => "'n",
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "Oe",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => "s",
        'ß' => "ss",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Þ' => "Th",
        'þ' => "th",
        'Ù'..='Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ŷ' | 'Ÿ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(plain)
}

fn is_word_break(prev: char, cur: char, next: Option<char>) -> bool {
    let letter_digit = (prev.is_alphabetic() && cur.is_numeric())
        || (prev.is_numeric() && cur.is_alphabetic());
    let camel = prev.is_lowercase() && cur.is_uppercase();
    let acronym_end =
        prev.is_uppercase() && cur.is_uppercase() && next.is_some_and(char::is_lowercase);
    letter_digit || camel || acronym_end
}
