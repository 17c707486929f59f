//! Bundle validation
//!
//! Checks every language before a channel sends anything, collecting every
//! problem instead of stopping at the first. Validation only reads files; it
//! never talks to a channel.

use crate::bundle::{find_images, ContentBundle};
use crate::settings::LanguageSpec;
use herald_channels::{load_recipients, ChannelKind, RecipientTarget};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One reason a bundle cannot be sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Recipient list file does not exist
    #[error("{language}: recipient list not found: {}", path.display())]
    RecipientListMissing {
        /// Language name
        language: String,
        /// Configured list path
        path: PathBuf,
    },

    /// Recipient list exists but is not a list of recipients
    #[error("{language}: recipient list {} is invalid: {reason}", path.display())]
    RecipientListInvalid {
        /// Language name
        language: String,
        /// Configured list path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Bundle directory does not exist
    #[error("{language}: folder not found: {}", path.display())]
    BundleDirMissing {
        /// Language name
        language: String,
        /// Bundle directory
        path: PathBuf,
    },

    /// No image for the language's prefix
    #[error("{language}: no image file found for prefix '{prefix}' in {}", dir.display())]
    ImageMissing {
        /// Language name
        language: String,
        /// Image prefix
        prefix: String,
        /// Bundle directory
        dir: PathBuf,
    },

    /// More than one image for the language's prefix
    #[error("{language}: {} image files match prefix '{prefix}'", candidates.len())]
    ImageAmbiguous {
        /// Language name
        language: String,
        /// Image prefix
        prefix: String,
        /// Every matching file
        candidates: Vec<PathBuf>,
    },

    /// Caption file does not exist
    #[error("{language}: message file not found: {}", path.display())]
    CaptionMissing {
        /// Language name
        language: String,
        /// Caption path
        path: PathBuf,
    },

    /// Caption file is empty after trimming
    #[error("{language}: message file is empty: {}", path.display())]
    CaptionEmpty {
        /// Language name
        language: String,
        /// Caption path
        path: PathBuf,
    },

    /// A file or directory exists but could not be read
    #[error("{language}: cannot read {}: {reason}", path.display())]
    Unreadable {
        /// Language name
        language: String,
        /// Offending path
        path: PathBuf,
        /// IO message
        reason: String,
    },
}

impl ValidationError {
    /// Language the problem belongs to
    #[must_use]
    pub fn language(&self) -> &str {
        match self {
            Self::RecipientListMissing { language, .. }
            | Self::RecipientListInvalid { language, .. }
            | Self::BundleDirMissing { language, .. }
            | Self::ImageMissing { language, .. }
            | Self::ImageAmbiguous { language, .. }
            | Self::CaptionMissing { language, .. }
            | Self::CaptionEmpty { language, .. }
            | Self::Unreadable { language, .. } => language,
        }
    }
}

/// Everything needed to send one language on one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePlan {
    /// The language
    pub language: LanguageSpec,
    /// The single matching image
    pub image: PathBuf,
    /// Trimmed caption text
    pub caption: String,
    /// Recipients in file order; `None` when the channel has no list for this
    /// language (status posts, or an unconfigured list)
    pub recipients: Option<Vec<RecipientTarget>>,
}

/// Validate a bundle for one channel, loading what the sends will need
///
/// Returns every problem across every language when anything is wrong.
pub fn plan_channel(
    bundle: &ContentBundle,
    languages: &[LanguageSpec],
    kind: ChannelKind,
) -> Result<Vec<LanguagePlan>, Vec<ValidationError>> {
    let mut plans = Vec::with_capacity(languages.len());
    let mut errors = Vec::new();

    for lang in languages {
        match plan_language(bundle, lang, kind) {
            Ok(plan) => plans.push(plan),
            Err(mut lang_errors) => errors.append(&mut lang_errors),
        }
    }

    if errors.is_empty() {
        Ok(plans)
    } else {
        Err(errors)
    }
}

/// Validate a bundle for one channel
///
/// An empty list means the bundle can be sent in full.
#[must_use]
pub fn validate(
    bundle: &ContentBundle,
    languages: &[LanguageSpec],
    kind: ChannelKind,
) -> Vec<ValidationError> {
    plan_channel(bundle, languages, kind).err().unwrap_or_default()
}

fn plan_language(
    bundle: &ContentBundle,
    lang: &LanguageSpec,
    kind: ChannelKind,
) -> Result<LanguagePlan, Vec<ValidationError>> {
    let language = lang.name.clone();
    let mut errors = Vec::new();

    // 1. Recipient list
    let recipients = match lang.recipient_list(kind) {
        Some(path) => match check_recipients(&language, path, kind) {
            Ok(list) => Some(list),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        None => None,
    };

    // 2. Bundle directory
    let dir = &bundle.source_path;
    if !dir.is_dir() {
        errors.push(ValidationError::BundleDirMissing {
            language,
            path: dir.clone(),
        });
        return Err(errors);
    }

    // 3. Exactly one image
    let image = match find_images(dir, &lang.image_prefix) {
        Ok(mut found) if found.len() == 1 => found.pop(),
        Ok(found) if found.is_empty() => {
            errors.push(ValidationError::ImageMissing {
                language: language.clone(),
                prefix: lang.image_prefix.clone(),
                dir: dir.clone(),
            });
            None
        }
        Ok(found) => {
            errors.push(ValidationError::ImageAmbiguous {
                language: language.clone(),
                prefix: lang.image_prefix.clone(),
                candidates: found,
            });
            None
        }
        Err(e) => {
            errors.push(ValidationError::Unreadable {
                language: language.clone(),
                path: dir.clone(),
                reason: e.to_string(),
            });
            None
        }
    };

    // 4. Non-empty caption
    let caption_path = dir.join(&lang.caption_file);
    let caption = match std::fs::read_to_string(&caption_path) {
        Ok(text) if text.trim().is_empty() => {
            errors.push(ValidationError::CaptionEmpty {
                language: language.clone(),
                path: caption_path,
            });
            None
        }
        Ok(text) => Some(text.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            errors.push(ValidationError::CaptionMissing {
                language: language.clone(),
                path: caption_path,
            });
            None
        }
        Err(e) => {
            errors.push(ValidationError::Unreadable {
                language: language.clone(),
                path: caption_path,
                reason: e.to_string(),
            });
            None
        }
    };

    match (image, caption) {
        (Some(image), Some(caption)) if errors.is_empty() => Ok(LanguagePlan {
            language: lang.clone(),
            image,
            caption,
            recipients,
        }),
        _ => Err(errors),
    }
}

fn check_recipients(
    language: &str,
    path: &Path,
    kind: ChannelKind,
) -> Result<Vec<RecipientTarget>, ValidationError> {
    if !path.is_file() {
        return Err(ValidationError::RecipientListMissing {
            language: language.to_string(),
            path: path.to_path_buf(),
        });
    }
    load_recipients(path, kind).map_err(|e| ValidationError::RecipientListInvalid {
        language: language.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path().join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn bundle(&self) -> ContentBundle {
            ContentBundle::root(self.path())
        }
    }

    fn english(list: &Path) -> LanguageSpec {
        LanguageSpec::new("english", "e", "english.txt").with_whatsapp_groups(list)
    }

    #[test]
    fn test_valid_bundle_produces_plan() {
        let fx = Fixture::new();
        let list = fx.write("wa.json", r#"[{"name": "A", "id": "1@g.us"}]"#);
        fx.write("E.jpg", "img");
        fx.write("english.txt", "  Good morning  \n");

        let plans = plan_channel(&fx.bundle(), &[english(&list)], ChannelKind::WhatsAppGroups)
            .unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].image, fx.path().join("E.jpg"));
        assert_eq!(plans[0].caption, "Good morning");
        assert_eq!(plans[0].recipients.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_reports_every_problem() {
        let fx = Fixture::new();
        let missing_list = fx.path().join("missing.json");
        fx.write("tamil.txt", "   ");
        let languages = vec![
            english(&missing_list),
            LanguageSpec::new("tamil", "t", "tamil.txt"),
        ];

        let errors = validate(&fx.bundle(), &languages, ChannelKind::WhatsAppGroups);

        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(matches!(errors[0], ValidationError::RecipientListMissing { .. }));
        assert!(matches!(errors[1], ValidationError::ImageMissing { .. }));
        assert!(matches!(errors[2], ValidationError::CaptionMissing { .. }));
        assert!(matches!(errors[3], ValidationError::ImageMissing { .. }));
        assert!(matches!(errors[4], ValidationError::CaptionEmpty { .. }));
        assert_eq!(errors[4].language(), "tamil");
    }

    #[test]
    fn test_invalid_recipient_list() {
        let fx = Fixture::new();
        let list = fx.write("wa.json", r#"{"not": "a list"}"#);
        fx.write("e.png", "img");
        fx.write("english.txt", "hi");

        let errors = validate(&fx.bundle(), &[english(&list)], ChannelKind::WhatsAppGroups);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::RecipientListInvalid { .. }));
    }

    #[test]
    fn test_two_images_for_one_prefix_is_ambiguous() {
        let fx = Fixture::new();
        fx.write("e.jpg", "a");
        fx.write("e.png", "b");
        fx.write("english.txt", "hi");
        let lang = LanguageSpec::new("english", "e", "english.txt");

        let errors = validate(&fx.bundle(), &[lang], ChannelKind::WhatsAppStatus);
        assert!(matches!(
            &errors[..],
            [ValidationError::ImageAmbiguous { candidates, .. }] if candidates.len() == 2
        ));
    }

    #[test]
    fn test_missing_bundle_dir_skips_file_checks() {
        let fx = Fixture::new();
        let bundle = ContentBundle::root(fx.path().join("queue").join("4"));
        let lang = LanguageSpec::new("english", "e", "english.txt");

        let errors = validate(&bundle, &[lang], ChannelKind::WhatsAppStatus);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::BundleDirMissing { .. }));
    }

    #[test]
    fn test_status_ignores_recipient_lists() {
        let fx = Fixture::new();
        fx.write("e.jpg", "img");
        fx.write("english.txt", "hi");
        let lang = english(&fx.path().join("missing.json"));

        let plans = plan_channel(&fx.bundle(), &[lang], ChannelKind::WhatsAppStatus).unwrap();
        assert_eq!(plans[0].recipients, None);
    }

    #[test]
    fn test_unconfigured_list_yields_no_recipients() {
        let fx = Fixture::new();
        fx.write("e.jpg", "img");
        fx.write("english.txt", "hi");
        let lang = LanguageSpec::new("english", "e", "english.txt");

        let plans = plan_channel(&fx.bundle(), &[lang], ChannelKind::Telegram).unwrap();
        assert_eq!(plans[0].recipients, None);
    }
}
