use crate::domain::account::{OrganizationAccount, SubAccount};
use crate::domain::ports::AccountDirectory;
use crate::error::Result;

/// Result of resolving a raw account-reference string.
///
/// `Malformed` (unparseable reference) is distinct from `NotFound` (a valid
/// number nobody is registered under): the former fails silently, the latter
/// carries a user-facing message.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ResolveResult {
    Organization {
        organization: OrganizationAccount,
        sub_accounts: Vec<SubAccount>,
    },
    Single(SubAccount),
    NotFound,
    Malformed,
}

/// Maps an external account reference to its billed entity.
///
/// Organizations are checked first; a reference that is both an organization
/// and a sub-account reg_no resolves as the organization.
pub struct AccountResolver<'a> {
    directory: &'a dyn AccountDirectory,
}

impl<'a> AccountResolver<'a> {
    pub fn new(directory: &'a dyn AccountDirectory) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, raw_reference: &str) -> Result<ResolveResult> {
        let Ok(reg_no) = raw_reference.trim().parse::<u64>() else {
            return Ok(ResolveResult::Malformed);
        };

        if let Some(organization) = self.directory.find_organization(reg_no).await? {
            let sub_accounts = self.directory.organization_sub_accounts(reg_no).await?;
            return Ok(ResolveResult::Organization {
                organization,
                sub_accounts,
            });
        }

        match self.directory.find_sub_account(reg_no).await? {
            Some(sub_account) => Ok(ResolveResult::Single(sub_account)),
            None => Ok(ResolveResult::NotFound),
        }
    }
}
