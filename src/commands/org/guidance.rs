//! Checklists for setup steps the REST API does not cover.

use indoc::indoc;

pub(crate) const AUTOMATION_CHECKLIST: &str = indoc! {"
    🤖 Setting up automation...

    ⚠️  Automation setup requires manual configuration
       - Issue templates need to be created in .github/ISSUE_TEMPLATE/
       - Workflows need to be configured in .github/workflows/
       - Branch protection rules are set up in repository setup"};

pub(crate) const SECURITY_CHECKLIST: &str = indoc! {"
    🔒 Setting up security...

    ⚠️  Security setup requires manual configuration
       - Security policies need to be created in SECURITY.md
       - Dependency scanning needs to be enabled in repository settings
       - Two-factor authentication should be enforced for organization members"};
