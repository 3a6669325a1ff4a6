//! Exit codes reported by the sops binary.
//!
//! Mirrors `cmd/sops/codes/codes.go` in the sops repository. The table is
//! maintained by hand and must be revisited whenever sops changes its codes.

/// Known sops exit codes and their symbolic names, sorted by code.
pub const SOPS_ERROR_CODES: &[(i32, &str)] = &[
    (1, "ErrorGeneric"),
    (2, "CouldNotReadInputFile"),
    (3, "CouldNotWriteOutputFile"),
    (4, "ErrorDumpingTree"),
    (5, "ErrorReadingConfig"),
    (6, "ErrorInvalidKMSEncryptionContextFormat"),
    (7, "ErrorInvalidSetFormat"),
    (8, "ErrorConflictingParameters"),
    (21, "ErrorEncryptingMac"),
    (23, "ErrorEncryptingTree"),
    (24, "ErrorDecryptingMac"),
    (25, "ErrorDecryptingTree"),
    (49, "CannotChangeKeysFromNonExistentFile"),
    (51, "MacMismatch"),
    (52, "MacNotFound"),
    (61, "ConfigFileNotFound"),
    (85, "KeyboardInterrupt"),
    (91, "InvalidTreePathFormat"),
    (100, "NoFileSpecified"),
    (111, "NoEncryptionKeyFound"),
    (128, "CouldNotRetrieveKey"),
    (200, "FileHasNotBeenModified"),
    (201, "NoEditorFound"),
    (202, "FailedToCompareVersions"),
    (203, "FileAlreadyEncrypted"),
];

/// Look up the symbolic name for a sops exit code.
pub fn category(exit_code: i32) -> Option<&'static str> {
    SOPS_ERROR_CODES
        .binary_search_by_key(&exit_code, |&(code, _)| code)
        .ok()
        .map(|idx| SOPS_ERROR_CODES[idx].1)
}
