//! End-to-end checks of generated token shapes and uniqueness

use fake_tokens::tokens::Alphabet;
use fake_tokens::{FormatValidator, GenerateOptions, TokenError, TokenFormat, TokenGenerator};
use std::collections::HashSet;

fn expected_prefix(format: TokenFormat) -> &'static str {
    match format {
        TokenFormat::GithubClassic => "ghp_",
        TokenFormat::GithubFineGrained => "github_pat_",
        TokenFormat::Gitlab => "glpat-",
        TokenFormat::Npm => "npm_",
        TokenFormat::AwsAccessKey => "AKIA",
        TokenFormat::AwsSecretKey => "",
    }
}

fn expected_length(format: TokenFormat) -> usize {
    match format {
        TokenFormat::GithubClassic => 40,
        TokenFormat::GithubFineGrained => 93,
        TokenFormat::Gitlab => 26,
        TokenFormat::Npm => 40,
        TokenFormat::AwsAccessKey => 20,
        TokenFormat::AwsSecretKey => 40,
    }
}

#[test]
fn test_every_format_has_catalog_prefix_length_and_alphabet() {
    let generator = TokenGenerator::new();

    for format in TokenFormat::ALL {
        let prefix = expected_prefix(format);
        let tokens = generator
            .generate_batch_with(200, format, &GenerateOptions::default())
            .unwrap();

        for token in tokens {
            assert!(token.starts_with(prefix), "{}: {}", format, token);
            assert_eq!(token.len(), expected_length(format), "{}: {}", format, token);

            let body = &token[prefix.len()..];
            assert!(
                body.chars().all(|c| format.alphabet().contains(c)),
                "{}: {}",
                format,
                token
            );
        }
    }
}

#[test]
fn test_body_alphabets_match_vendor_grammars() {
    let generator = TokenGenerator::new();

    let npm = generator.generate_batch(100, "npm").unwrap();
    assert!(npm.iter().all(|t| t[4..]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')));

    let access_keys = generator.generate_batch(100, "aws_access_key").unwrap();
    assert!(access_keys.iter().all(|t| t[4..]
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())));

    let secret_keys = generator.generate_batch(100, "aws_secret_key").unwrap();
    assert!(secret_keys.iter().all(|t| t
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')));

    assert_eq!(TokenFormat::Gitlab.alphabet(), Alphabet::ALPHANUMERIC);
}

#[test]
fn test_ten_thousand_tokens_are_distinct() {
    let generator = TokenGenerator::new();

    for format in [TokenFormat::AwsAccessKey, TokenFormat::Gitlab] {
        let tokens = generator
            .generate_batch_with(10_000, format, &GenerateOptions::default())
            .unwrap();
        let unique: HashSet<&String> = tokens.iter().collect();

        assert_eq!(tokens.len(), 10_000);
        assert_eq!(unique.len(), 10_000);
    }

    assert_eq!(generator.history_size(), 20_000);
}

#[test]
fn test_clear_history_resets_size() {
    let generator = TokenGenerator::new();
    generator.generate_batch(25, "github_classic").unwrap();
    assert_eq!(generator.history_size(), 25);

    generator.clear_history();
    assert_eq!(generator.history_size(), 0);

    generator.clear_history();
    assert_eq!(generator.history_size(), 0);
}

#[test]
fn test_fine_grained_length_bounds() {
    let generator = TokenGenerator::new();

    let token = generator
        .generate(
            TokenFormat::GithubFineGrained,
            &GenerateOptions::default().with_total_length(93),
        )
        .unwrap();
    assert_eq!(token.len() - "github_pat_".len(), 82);

    let minimum = "github_pat_".len() + 10;
    let token = generator
        .generate(
            TokenFormat::GithubFineGrained,
            &GenerateOptions::default().with_total_length(minimum),
        )
        .unwrap();
    assert_eq!(token.len() - "github_pat_".len(), 10);

    let error = generator
        .generate(
            TokenFormat::GithubFineGrained,
            &GenerateOptions::default().with_total_length(minimum - 1),
        )
        .unwrap_err();
    assert!(matches!(error, TokenError::InvalidArgument { .. }));
}

#[test]
fn test_unknown_type_fails_without_output() {
    let generator = TokenGenerator::new();

    let result = generator.generate_batch(3, "bitbucket");

    assert!(matches!(result, Err(TokenError::InvalidArgument { .. })));
    assert_eq!(generator.history_size(), 0);
}

#[test]
fn test_aws_access_key_batch_example() {
    let generator = TokenGenerator::new();
    let keys = generator.generate_batch(3, "aws_access_key").unwrap();

    assert_eq!(keys.len(), 3);
    for key in &keys {
        assert!(key.starts_with("AKIA"));
        assert_eq!(key.len(), 20);
        assert!(key[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}

#[test]
fn test_generated_tokens_are_detected_as_their_format() {
    let generator = TokenGenerator::new();
    let validator = FormatValidator::new();

    for format in TokenFormat::ALL {
        let token = generator
            .generate(format, &GenerateOptions::default())
            .unwrap();

        assert!(validator.validate(format, &token, None).unwrap().valid);
        assert_eq!(validator.detect(&token), Some(format), "{}", token);
    }
}
