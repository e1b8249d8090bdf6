use super::sanitize_tree_path;

#[test]
fn test_valid_simple_path() {
    let result = sanitize_tree_path("contracts/Token.sol");
    assert_eq!(result.unwrap(), "contracts/Token.sol");
}

#[test]
fn test_valid_nested_path() {
    let result = sanitize_tree_path("src/tokens/erc20/ERC20.sol");
    assert_eq!(result.unwrap(), "src/tokens/erc20/ERC20.sol");
}

#[test]
fn test_hidden_directories_allowed() {
    let result = sanitize_tree_path(".github/fixtures/Mock.sol");
    assert_eq!(result.unwrap(), ".github/fixtures/Mock.sol");
}

#[test]
fn test_reject_parent_directory_traversal() {
    let result = sanitize_tree_path("../secrets/Vault.sol");
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Parent directory traversal")
    );
}

#[test]
fn test_reject_parent_in_middle() {
    let result = sanitize_tree_path("contracts/../../etc/passwd");
    assert!(result.is_err());
}

#[test]
fn test_reject_absolute_unix_path() {
    let result = sanitize_tree_path("/etc/passwd");
    assert!(result.unwrap_err().to_string().contains("Absolute path"));
}

#[test]
fn test_colon_in_name_is_not_a_drive() {
    assert_eq!(sanitize_tree_path("a:Token.sol").unwrap(), "a:Token.sol");
    assert_eq!(
        sanitize_tree_path("C:/contracts/Token.sol").unwrap(),
        "C:/contracts/Token.sol"
    );
}

#[test]
fn test_backslash_is_a_filename_character() {
    assert_eq!(
        sanitize_tree_path("contracts\\Token.sol").unwrap(),
        "contracts\\Token.sol"
    );
}

#[test]
fn test_reject_nul_byte() {
    let result = sanitize_tree_path("contracts/To\0ken.sol");
    assert!(result.unwrap_err().to_string().contains("Illegal character"));
}

#[test]
fn test_reject_empty_path() {
    let result = sanitize_tree_path("");
    assert!(result.unwrap_err().to_string().contains("Empty path"));
}

#[test]
fn test_normalize_current_dir_markers() {
    let result = sanitize_tree_path("./contracts/./Token.sol");
    assert_eq!(result.unwrap(), "contracts/Token.sol");
}

#[test]
fn test_collapse_repeated_slashes() {
    let result = sanitize_tree_path("contracts//lib///Math.sol");
    assert_eq!(result.unwrap(), "contracts/lib/Math.sol");
}

#[test]
fn test_reject_only_current_dir() {
    let result = sanitize_tree_path("./.");
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("No valid components")
    );
}

#[test]
fn test_path_with_spaces_and_unicode() {
    assert_eq!(
        sanitize_tree_path("My Contracts/토큰.vy").unwrap(),
        "My Contracts/토큰.vy"
    );
}
