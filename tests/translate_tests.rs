//! Integration tests for the translation engine.
//!
//! These exercise the engine's observable contract: ordering of on-boot
//! images, capability precedence and merge, mount rendering, namespace
//! policy, resource conversion, and the determinism guarantee.

use pod2boot::spec::{
    Capabilities, Container, EmptyDirVolume, EnvVar, EnvVarSource, HostPathVolume, PodSpec,
    SecurityContext, Volume, VolumeMount,
};
use pod2boot::translate_pod;
use pod2boot::Error;

// =============================================================================
// Test Helpers
// =============================================================================

/// A minimal container declaration.
fn container(name: &str) -> Container {
    Container {
        name: name.to_string(),
        image: format!("{name}:latest"),
        ..Container::default()
    }
}

fn host_path_volume(name: &str, path: &str) -> Volume {
    Volume {
        name: name.to_string(),
        host_path: Some(HostPathVolume {
            path: path.to_string(),
            type_: None,
        }),
        empty_dir: None,
    }
}

fn empty_dir_volume(name: &str) -> Volume {
    Volume {
        name: name.to_string(),
        host_path: None,
        empty_dir: Some(EmptyDirVolume {}),
    }
}

fn mount(volume: &str, path: &str) -> VolumeMount {
    VolumeMount {
        name: volume.to_string(),
        mount_path: path.to_string(),
        read_only: false,
        mount_propagation: None,
    }
}

fn pod_with(containers: Vec<Container>) -> PodSpec {
    PodSpec {
        containers,
        ..PodSpec::default()
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_spec_renders_identical_manifests() {
    let spec = PodSpec {
        hostname: Some("web-0".to_string()),
        volumes: vec![empty_dir_volume("scratch"), host_path_volume("logs", "/var/log")],
        init_containers: vec![container("setup")],
        containers: vec![
            Container {
                security_context: Some(SecurityContext {
                    capabilities: Some(Capabilities {
                        add: vec!["NET_ADMIN".to_string()],
                        drop: vec!["NET_RAW".to_string()],
                    }),
                    ..SecurityContext::default()
                }),
                volume_mounts: vec![mount("scratch", "/tmp/work"), mount("logs", "/logs")],
                ..container("web")
            },
            container("sidecar"),
        ],
        ..PodSpec::default()
    };

    let first = serde_yaml::to_string(&translate_pod(&spec).unwrap()).unwrap();
    let second = serde_yaml::to_string(&translate_pod(&spec).unwrap()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_volume_prep_images_precede_init_containers() {
    let spec = PodSpec {
        volumes: vec![empty_dir_volume("a"), empty_dir_volume("b")],
        init_containers: vec![container("migrate"), container("seed")],
        containers: vec![container("web")],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    let onboot = manifest.onboot.unwrap();
    let names: Vec<&str> = onboot.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "create-volume-a",
            "create-volume-b",
            "initContainer-0-migrate",
            "initContainer-1-seed",
        ]
    );
}

#[test]
fn test_service_naming_and_order() {
    let spec = pod_with(vec![container("web"), container("sidecar")]);
    let manifest = translate_pod(&spec).unwrap();
    let services = manifest.services.unwrap();
    let names: Vec<&str> = services.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["container-web", "container-sidecar"]);
}

#[test]
fn test_empty_collections_are_omitted() {
    // No init containers and no volumes needing preparation: the
    // on-boot list must be absent, not empty.
    let spec = PodSpec {
        volumes: vec![host_path_volume("data", "/srv/data")],
        containers: vec![container("web")],
        ..PodSpec::default()
    };
    let manifest = translate_pod(&spec).unwrap();
    assert!(manifest.onboot.is_none());
    assert!(manifest.services.is_some());
}

#[test]
fn test_no_containers_leaves_services_unset() {
    let manifest = translate_pod(&PodSpec::default()).unwrap();
    assert!(manifest.onboot.is_none());
    assert!(manifest.services.is_none());
}

// =============================================================================
// Capabilities
// =============================================================================

#[test]
fn test_privileged_container_gets_all_sentinel() {
    let spec = pod_with(vec![Container {
        security_context: Some(SecurityContext {
            privileged: Some(true),
            // Add/drop lists are irrelevant once privileged.
            capabilities: Some(Capabilities {
                add: vec!["SYS_ADMIN".to_string()],
                drop: vec!["CHOWN".to_string()],
            }),
            ..SecurityContext::default()
        }),
        ..container("web")
    }]);

    let manifest = translate_pod(&spec).unwrap();
    let image = &manifest.services.unwrap()[0];
    assert_eq!(image.config.capabilities, Some(vec!["all".to_string()]));
}

#[test]
fn test_capability_merge_add_and_drop() {
    let spec = pod_with(vec![Container {
        security_context: Some(SecurityContext {
            capabilities: Some(Capabilities {
                add: vec!["NET_ADMIN".to_string(), "SYS_TIME".to_string()],
                drop: vec!["NET_RAW".to_string(), "SYS_TIME".to_string()],
            }),
            ..SecurityContext::default()
        }),
        ..container("web")
    }]);

    let manifest = translate_pod(&spec).unwrap();
    let caps = manifest.services.unwrap()[0]
        .config
        .capabilities
        .clone()
        .unwrap();

    // Dropped from the default grant.
    assert!(!caps.contains(&"CAP_NET_RAW".to_string()));
    // Added on top of it.
    assert!(caps.contains(&"CAP_NET_ADMIN".to_string()));
    // Added then dropped: the later directive wins.
    assert!(!caps.contains(&"CAP_SYS_TIME".to_string()));
    // The rest of the default grant survives.
    assert!(caps.contains(&"CAP_CHOWN".to_string()));
    assert!(caps.contains(&"CAP_SETPCAP".to_string()));
}

#[test]
fn test_default_grant_when_no_security_context() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    let caps = manifest.services.unwrap()[0]
        .config
        .capabilities
        .clone()
        .unwrap();
    assert_eq!(caps.len(), 14);
    assert_eq!(caps[0], "CAP_SETPCAP");
    assert!(caps.contains(&"CAP_NET_BIND_SERVICE".to_string()));
}

// =============================================================================
// Mounts
// =============================================================================

#[test]
fn test_mount_rendering() {
    let spec = PodSpec {
        volumes: vec![host_path_volume("v", "/data")],
        containers: vec![Container {
            volume_mounts: vec![VolumeMount {
                name: "v".to_string(),
                mount_path: "/app/data".to_string(),
                read_only: true,
                mount_propagation: Some("Bidirectional".to_string()),
            }],
            ..container("web")
        }],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    let image = &manifest.services.unwrap()[0];
    let binds = image.config.binds.clone().unwrap();
    assert_eq!(
        binds,
        vec![
            "/etc/resolv.conf:/etc/resolv.conf".to_string(),
            "/data:/app/data:ro,rshared".to_string(),
        ]
    );
    assert_eq!(image.config.rootfs_propagation.as_deref(), Some("rshared"));
}

#[test]
fn test_baseline_bind_always_present() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    let binds = manifest.services.unwrap()[0].config.binds.clone().unwrap();
    assert_eq!(binds, vec!["/etc/resolv.conf:/etc/resolv.conf".to_string()]);
}

#[test]
fn test_last_propagating_mount_wins() {
    let spec = PodSpec {
        volumes: vec![host_path_volume("a", "/a"), host_path_volume("b", "/b")],
        containers: vec![Container {
            volume_mounts: vec![
                VolumeMount {
                    mount_propagation: Some("Bidirectional".to_string()),
                    ..mount("a", "/mnt/a")
                },
                VolumeMount {
                    mount_propagation: Some("HostToContainer".to_string()),
                    ..mount("b", "/mnt/b")
                },
            ],
            ..container("web")
        }],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    let image = &manifest.services.unwrap()[0];
    assert_eq!(image.config.rootfs_propagation.as_deref(), Some("rslave"));
}

#[test]
fn test_dangling_mount_aborts_run() {
    let spec = PodSpec {
        volumes: vec![host_path_volume("data", "/data")],
        containers: vec![
            container("ok"),
            Container {
                volume_mounts: vec![mount("ghost", "/app")],
                ..container("broken")
            },
        ],
        ..PodSpec::default()
    };

    let err = translate_pod(&spec).unwrap_err();
    match err {
        Error::UnresolvedVolume(name) => assert_eq!(name, "ghost"),
        other => panic!("expected UnresolvedVolume, got {other:?}"),
    }
}

#[test]
fn test_unsupported_volume_aborts_run() {
    let spec = PodSpec {
        volumes: vec![Volume {
            name: "secrets".to_string(),
            host_path: None,
            empty_dir: None,
        }],
        containers: vec![container("web")],
        ..PodSpec::default()
    };

    let err = translate_pod(&spec).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVolume(name) if name == "secrets"));
}

// =============================================================================
// Identity, Env, Command
// =============================================================================

#[test]
fn test_identity_fields_carried() {
    let spec = PodSpec {
        hostname: Some("web-0".to_string()),
        containers: vec![Container {
            working_dir: Some("/srv".to_string()),
            command: Some(vec!["/bin/server".to_string(), "--fg".to_string()]),
            ..container("web")
        }],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    let image = &manifest.services.unwrap()[0];
    assert_eq!(image.name, "container-web");
    assert_eq!(image.image, "web:latest");
    assert_eq!(image.config.cwd, "/srv");
    assert_eq!(image.config.hostname, "web-0");
    assert_eq!(
        image.config.command,
        Some(vec!["/bin/server".to_string(), "--fg".to_string()])
    );
}

#[test]
fn test_absent_command_defers_to_entrypoint() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    assert!(manifest.services.unwrap()[0].config.command.is_none());
}

#[test]
fn test_env_literals_rendered_and_indirection_skipped() {
    let spec = pod_with(vec![Container {
        env: vec![
            EnvVar {
                name: "MODE".to_string(),
                value: Some("prod".to_string()),
                value_from: None,
            },
            EnvVar {
                name: "SECRET".to_string(),
                value: None,
                value_from: Some(EnvVarSource {}),
            },
            EnvVar {
                name: "EMPTY".to_string(),
                value: None,
                value_from: None,
            },
        ],
        ..container("web")
    }]);

    let manifest = translate_pod(&spec).unwrap();
    let env = manifest.services.unwrap()[0].config.env.clone().unwrap();
    assert_eq!(env, vec!["MODE=prod".to_string(), "EMPTY=".to_string()]);
}

#[test]
fn test_env_omitted_when_all_entries_skipped() {
    let spec = pod_with(vec![Container {
        env: vec![EnvVar {
            name: "SECRET".to_string(),
            value: None,
            value_from: Some(EnvVarSource {}),
        }],
        ..container("web")
    }]);

    let manifest = translate_pod(&spec).unwrap();
    assert!(manifest.services.unwrap()[0].config.env.is_none());
}

// =============================================================================
// Security Flags
// =============================================================================

#[test]
fn test_security_flags_carried_verbatim() {
    let spec = pod_with(vec![Container {
        security_context: Some(SecurityContext {
            run_as_user: Some(1000),
            run_as_group: Some(2000),
            read_only_root_filesystem: Some(true),
            allow_privilege_escalation: Some(false),
            ..SecurityContext::default()
        }),
        ..container("web")
    }]);

    let manifest = translate_pod(&spec).unwrap();
    let config = &manifest.services.unwrap()[0].config;
    assert_eq!(config.uid, Some(pod2boot::manifest::IdValue::Num(1000)));
    assert_eq!(config.gid, Some(pod2boot::manifest::IdValue::Num(2000)));
    assert_eq!(config.readonly, Some(true));
    assert_eq!(config.no_new_privileges, Some(false));
}

#[test]
fn test_unspecified_security_flags_stay_unset() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    let config = &manifest.services.unwrap()[0].config;
    assert!(config.uid.is_none());
    assert!(config.readonly.is_none());
    assert!(config.no_new_privileges.is_none());
}

// =============================================================================
// PID Namespace Policy
// =============================================================================

#[test]
fn test_host_pid_sets_every_container() {
    let spec = PodSpec {
        host_pid: true,
        init_containers: vec![container("setup")],
        containers: vec![container("web"), container("sidecar")],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    for image in manifest.onboot.unwrap().iter() {
        assert_eq!(image.config.pid, "host");
    }
    for image in manifest.services.unwrap().iter() {
        assert_eq!(image.config.pid, "host");
    }
}

#[test]
fn test_shared_process_namespace() {
    let spec = PodSpec {
        share_process_namespace: Some(true),
        containers: vec![container("web")],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    assert_eq!(
        manifest.services.unwrap()[0].config.pid,
        "/run/pidns/shared-namespace"
    );
}

#[test]
fn test_host_pid_takes_precedence_over_shared() {
    let spec = PodSpec {
        host_pid: true,
        share_process_namespace: Some(true),
        containers: vec![container("web")],
        ..PodSpec::default()
    };

    let manifest = translate_pod(&spec).unwrap();
    assert_eq!(manifest.services.unwrap()[0].config.pid, "host");
}

#[test]
fn test_default_pid_namespace_left_unset() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    let image = &manifest.services.unwrap()[0];
    assert!(image.config.pid.is_empty());
    // Net/IPC/UTS are never set: the destination runtime already shares
    // them across all images.
    assert!(image.config.net.is_empty());
    assert!(image.config.ipc.is_empty());
    assert!(image.config.uts.is_empty());
}

// =============================================================================
// Resources
// =============================================================================

fn container_with_limits(limits: &[(&str, &str)]) -> Container {
    let yaml = limits
        .iter()
        .map(|(k, v)| format!("  {k}: \"{v}\""))
        .collect::<Vec<_>>()
        .join("\n");
    let resources: pod2boot::spec::ResourceRequirements =
        serde_yaml::from_str(&format!("limits:\n{yaml}")).unwrap();
    Container {
        resources,
        ..container("web")
    }
}

#[test]
fn test_cpu_and_memory_limits() {
    let spec = pod_with(vec![container_with_limits(&[
        ("cpu", "500m"),
        ("memory", "128Mi"),
    ])]);

    let manifest = translate_pod(&spec).unwrap();
    let resources = manifest.services.unwrap()[0]
        .config
        .resources
        .clone()
        .unwrap();
    assert_eq!(resources.cpu.unwrap().shares, Some(500));
    assert_eq!(resources.memory.unwrap().limit, Some(134_217_728));
}

#[test]
fn test_unknown_limit_names_skipped() {
    let spec = pod_with(vec![container_with_limits(&[(
        "ephemeral-storage",
        "1Gi",
    )])]);

    let manifest = translate_pod(&spec).unwrap();
    assert!(manifest.services.unwrap()[0].config.resources.is_none());
}

#[test]
fn test_unrepresentable_cpu_dropped_memory_kept() {
    let spec = pod_with(vec![container_with_limits(&[
        ("cpu", "9e30"),
        ("memory", "1Gi"),
    ])]);

    let manifest = translate_pod(&spec).unwrap();
    let resources = manifest.services.unwrap()[0]
        .config
        .resources
        .clone()
        .unwrap();
    assert!(resources.cpu.is_none());
    assert_eq!(resources.memory.unwrap().limit, Some(1_073_741_824));
}

#[test]
fn test_no_limits_omits_resources() {
    let spec = pod_with(vec![container("web")]);
    let manifest = translate_pod(&spec).unwrap();
    assert!(manifest.services.unwrap()[0].config.resources.is_none());
}
