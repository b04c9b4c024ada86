// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures: a throwaway PKI in the credential layout and secure
//! publishing participants.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dds_monitor::{local_hostname, Credentials, DomainId};
use hdds::{DataWriter, DdsTrait, Participant, QoS, TransportMode};
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair, KeyUsagePurpose};
use tempfile::{tempdir, TempDir};

/// Credential root holding a CA and an identity for this host.
pub struct Pki {
    dir: TempDir,
    pub credentials: Credentials,
}

impl Pki {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        let credentials = Credentials::for_host(dir.path(), &local_hostname());

        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.distinguished_name.push(DnType::CommonName, "e2e CA");
        ca_params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::DigitalSignature];
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![local_hostname()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, local_hostname());
        params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
        let cert = params.signed_by(&key, &ca_cert, &ca_key).unwrap();

        for (path, pem) in [
            (&credentials.identity_ca, ca_cert.pem()),
            (&credentials.identity_certificate, cert.pem()),
            (&credentials.private_key, key.serialize_pem()),
        ] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, pem).unwrap();
        }
        Self { dir, credentials }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("samples.log")
    }

    /// A secure publishing participant on `domain`.
    pub fn publisher(&self, domain: DomainId, transport: TransportMode) -> Arc<Participant> {
        Participant::builder("e2e-publisher")
            .with_transport(transport)
            .domain_id(domain)
            .with_security(self.credentials.security_config().unwrap())
            .build()
            .unwrap()
    }
}

/// Writer with the QoS the monitor's readers request.
pub fn writer<T: DdsTrait>(participant: &Arc<Participant>, topic: &str) -> DataWriter<T> {
    participant
        .create_writer::<T>(topic, QoS::reliable().transient_local().keep_all())
        .unwrap()
}
