// Keyword-triggered shortcuts that bypass the model for a fixed catalog of
// diagnostic and maintenance requests. Rule order is observable behavior:
// the first rule with any keyword phrase contained in the lowercased
// utterance wins, so more specific rules go ahead of broader ones.

use crate::types::{ActionDescriptor, CommandSpec};

pub struct ShortcutRule {
    keywords: Vec<&'static str>,
    descriptor: ActionDescriptor,
}

impl ShortcutRule {
    pub fn new(keywords: Vec<&'static str>, descriptor: ActionDescriptor) -> Self {
        Self {
            keywords,
            descriptor,
        }
    }
}

pub struct ShortcutTable {
    rules: Vec<ShortcutRule>,
}

impl ShortcutTable {
    pub fn new(rules: Vec<ShortcutRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    // First match wins.
    pub fn lookup(&self, utterance: &str) -> Option<&ActionDescriptor> {
        let lowered = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|rule| &rule.descriptor)
    }

    pub fn with_default_catalog() -> Self {
        Self::new(default_catalog())
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

fn confirmation(
    prompt: &str,
    summary: &str,
    path: Option<&str>,
    commands: Vec<CommandSpec>,
) -> ActionDescriptor {
    ActionDescriptor::Confirmation {
        prompt: prompt.to_string(),
        summary: Some(summary.to_string()),
        directory_change_path: path.map(str::to_string),
        commands,
    }
}

fn command(summary: &str, path: Option<&str>, commands: Vec<CommandSpec>) -> ActionDescriptor {
    ActionDescriptor::Command {
        summary: Some(summary.to_string()),
        directory_change_path: path.map(str::to_string),
        commands,
    }
}

fn default_catalog() -> Vec<ShortcutRule> {
    vec![
        // Performance issues: temp-file cleanup behind a confirmation.
        ShortcutRule::new(
            vec!["slow", "hanging", "hang", "lagging", "lags", "unresponsive"],
            confirmation(
                "I've detected that your system may be running slow. I can perform a cleanup of temporary and prefetch files, which is a safe operation that often improves performance. Shall I proceed?",
                "It looks like your PC is running slow. I can clear temporary files and caches to help speed it up.",
                None,
                vec![
                    CommandSpec::new("del /q/f/s %TEMP%\\*", "Deletes temporary files."),
                    CommandSpec::new(
                        "del /q/f/s C:\\Windows\\Prefetch\\*",
                        "Clears Windows Prefetch data.",
                    ),
                ],
            ),
        ),
        // Network issues.
        ShortcutRule::new(
            vec!["internet", "wi-fi", "wifi", "network", "connection", "connect"],
            confirmation(
                "I can attempt to fix your network issue by flushing the DNS cache and resetting the network stack. A computer restart may be required. Shall I proceed?",
                "I can troubleshoot your network connection by flushing the DNS cache and resetting the system's network stack.",
                None,
                vec![
                    CommandSpec::new("ipconfig /flushdns", "Clears the local DNS resolver cache."),
                    CommandSpec::new(
                        "netsh winsock reset",
                        "Resets the Winsock Catalog to a clean state.",
                    ),
                ],
            ),
        ),
        // Battery report.
        ShortcutRule::new(
            vec!["battery", "power", "drain"],
            command(
                "I will generate a detailed battery health report and save it as an HTML file.",
                Some("%USERPROFILE%\\battery-report.html"),
                vec![CommandSpec::new(
                    "powercfg /batteryreport",
                    "Generates a comprehensive report on battery usage and capacity.",
                )],
            ),
        ),
        // System health check.
        ShortcutRule::new(
            vec![
                "system health",
                "health report",
                "disk status",
                "check firewall",
                "diagnostic",
            ],
            command(
                "I will run a quick health check on your system, verifying disk drive status and firewall activity.",
                None,
                vec![
                    CommandSpec::new(
                        "wmic diskdrive get status,model",
                        "Checks the S.M.A.R.T. status of all connected disk drives.",
                    ),
                    CommandSpec::new(
                        "netsh advfirewall show allprofiles state",
                        "Displays the status of the Windows Defender Firewall.",
                    ),
                ],
            ),
        ),
        // Audio problems: restart the audio services.
        ShortcutRule::new(
            vec!["sound", "audio", "no sound", "can't hear", "speakers"],
            confirmation(
                "I can attempt to fix audio problems by restarting the core Windows Audio services. This is a quick and safe procedure that resolves most sound issues. Shall I proceed?",
                "I will attempt to fix common audio problems by restarting the core Windows Audio services.",
                None,
                vec![CommandSpec::powershell(
                    "Restart-Service -Name \"Audiosrv\", \"AudioEndpointBuilder\" -Force",
                    "Forcefully restarts the main Windows Audio and Audio Endpoint Builder services.",
                )],
            ),
        ),
        // Stuck print queue.
        ShortcutRule::new(
            vec!["printer", "printing", "stuck", "print queue", "can't print"],
            confirmation(
                "I can clear the entire print queue by resetting the print service. This will cancel all pending print jobs for all printers. Do you want to continue?",
                "I will reset the print spooler service to clear any stuck or failed print jobs.",
                None,
                vec![CommandSpec::powershell(
                    "Stop-Service -Name Spooler -Force; Remove-Item -Path C:\\Windows\\System32\\spool\\PRINTERS\\* -Recurse -Force -ErrorAction SilentlyContinue; Start-Service -Name Spooler",
                    "Stops the print service, deletes temporary print files, and restarts the service.",
                )],
            ),
        ),
        // Broken icon cache.
        ShortcutRule::new(
            vec![
                "icons are blank",
                "icons look wrong",
                "broken icons",
                "fix desktop icons",
            ],
            confirmation(
                "I can fix broken or blank icons by rebuilding the icon cache. This will cause your desktop and taskbar to briefly disappear and then reload. It is a safe operation. Would you like to proceed?",
                "I can fix issues with blank or corrupted icons by rebuilding the system's icon cache.",
                None,
                vec![CommandSpec::new(
                    "taskkill /IM explorer.exe /F; DEL /A /Q \"%localappdata%\\IconCache.db\"; start explorer.exe",
                    "Force-closes Windows Explorer, deletes the icon cache database, and restarts Explorer.",
                )],
            ),
        ),
        // Huge files review.
        ShortcutRule::new(
            vec!["huge files", "large files", "move big files", "free up space"],
            confirmation(
                "I will scan your 'Documents' folder for files larger than 100MB and move them to a new 'Large Files Review' folder on your Desktop for you to manage. Is that okay?",
                "I will find files larger than 100MB in your Documents folder and move them to your desktop for review.",
                Some("%USERPROFILE%\\Desktop\\Large Files Review"),
                vec![CommandSpec::powershell(
                    "New-Item -Path \"$env:USERPROFILE\\Desktop\\Large Files Review\" -ItemType Directory -ErrorAction SilentlyContinue; Get-ChildItem -Path \"$env:USERPROFILE\\Documents\" -Recurse -File | Where-Object { $_.Length -gt 100MB } | Move-Item -Destination \"$env:USERPROFILE\\Desktop\\Large Files Review\"",
                    "Finds files >100MB in the Documents folder and moves them to a review folder.",
                )],
            ),
        ),
        // Top 10 largest files.
        ShortcutRule::new(
            vec![
                "largest files",
                "top 10 files",
                "what's taking up space",
                "disk usage",
            ],
            command(
                "I will scan your entire C: drive to find the 10 largest files. This may take a few moments to complete, please be patient.",
                None,
                vec![CommandSpec::powershell(
                    "Get-ChildItem -Path C:\\ -Recurse -File -ErrorAction SilentlyContinue | Sort-Object Length -Descending | Select-Object -First 10 | Format-Table @{Name=\"Gigabytes\";Expression={($_.Length / 1GB).ToString('F2')}}, Name, Directory -AutoSize",
                    "Finds the 10 largest files on the C: drive and displays their size in GB.",
                )],
            ),
        ),
        // Startup programs.
        ShortcutRule::new(
            vec![
                "startup programs",
                "slow startup",
                "what runs on startup",
                "login items",
            ],
            command(
                "I will list all the applications that are configured to run automatically when you log in to Windows.",
                None,
                vec![CommandSpec::powershell(
                    "Get-CimInstance Win32_StartupCommand | Select-Object Name, Command, Location, User | Format-Table -AutoSize",
                    "Retrieves a list of all programs that run on system startup.",
                )],
            ),
        ),
        // Resource hogs.
        ShortcutRule::new(
            vec![
                "resource hogs",
                "top processes",
                "check memory usage",
                "find slow process",
            ],
            command(
                "I will find the top 10 running processes on your system consuming the most memory (RAM).",
                None,
                vec![CommandSpec::powershell(
                    "Get-Process | Sort-Object WS -Descending | Select-Object -First 10 | Format-Table Name, @{Name=\"Memory (MB)\"; Expression={($_.WS / 1MB).ToString('F2')}}, CPU, Path -AutoSize",
                    "Lists the top 10 processes by memory usage.",
                )],
            ),
        ),
        // Developer cache cleanup.
        ShortcutRule::new(
            vec!["clean project", "nuke cache", "clear cache", "reset environment"],
            confirmation(
                "This will forcefully clear the caches for NPM and NuGet, and run Git's garbage collection. This is generally safe but irreversible. Proceed?",
                "I will perform a deep clean of common developer caches (NPM, NuGet, Git).",
                None,
                vec![
                    CommandSpec::new(
                        "npm cache clean --force",
                        "Forcefully clears the Node Package Manager (NPM) cache.",
                    ),
                    CommandSpec::new(
                        "dotnet nuget locals all --clear",
                        "Clears all NuGet package caches for .NET.",
                    ),
                    CommandSpec::new(
                        "git gc --prune=now --aggressive",
                        "Performs aggressive garbage collection on the current Git repository.",
                    ),
                ],
            ),
        ),
        // Personal backup.
        ShortcutRule::new(
            vec!["backup", "save my files", "backup documents", "protect my data"],
            confirmation(
                "I can back up your Desktop, Documents, and Pictures folders into a single, dated ZIP file on your Desktop. This might take a few minutes depending on the number of files. Shall I create the backup now?",
                "I will create a backup of your essential personal folders (Desktop, Documents, and Pictures) into a single ZIP file on your Desktop.",
                None,
                vec![CommandSpec::powershell(
                    "Compress-Archive -Path \"$env:USERPROFILE\\Documents\", \"$env:USERPROFILE\\Pictures\", \"$env:USERPROFILE\\Desktop\" -DestinationPath \"$env:USERPROFILE\\Desktop\\My_Backup_$(Get-Date -Format 'yyyy-MM-dd').zip\" -Force",
                    "Compresses the contents of the Desktop, Documents, and Pictures folders into a single ZIP archive.",
                )],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_clarification(question: &str) -> ActionDescriptor {
        ActionDescriptor::Clarification {
            question: question.to_string(),
        }
    }

    #[test]
    fn earlier_rule_wins_when_both_match() {
        let table = ShortcutTable::new(vec![
            ShortcutRule::new(vec!["disk", "slow"], canned_clarification("first")),
            ShortcutRule::new(vec!["slow", "cleanup"], canned_clarification("second")),
        ]);

        // "slow" matches both rules; the earlier-registered one must win,
        // deterministically across repeated calls.
        for _ in 0..10 {
            match table.lookup("my disk is slow") {
                Some(ActionDescriptor::Clarification { question }) => {
                    assert_eq!(question, "first")
                }
                other => panic!("unexpected lookup result: {:?}", other.map(|d| d.kind_name())),
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = ShortcutTable::with_default_catalog();
        assert!(table.lookup("My PC Is SLOW today").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let table = ShortcutTable::with_default_catalog();
        assert!(table.lookup("write me a poem about ferris").is_none());
    }

    #[test]
    fn slow_utterance_yields_gated_cleanup() {
        let table = ShortcutTable::with_default_catalog();
        match table.lookup("my computer is really slow") {
            Some(ActionDescriptor::Confirmation {
                prompt, commands, ..
            }) => {
                assert!(!prompt.is_empty());
                assert_eq!(commands.len(), 2);
            }
            other => panic!("expected confirmation, got {:?}", other.map(|d| d.kind_name())),
        }
    }
}
